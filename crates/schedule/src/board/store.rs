use poolservice_shared::Result;
use sqlx::SqlitePool;
use time::Date;

use crate::{Command, InstanceChanges, InstanceRow, NewInstance, Query};

/// Persistence seen by the board.
#[async_trait::async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list(&self, start: Date, end: Date) -> Result<Vec<InstanceRow>>;
    async fn list_unscheduled(&self) -> Result<Vec<InstanceRow>>;
    async fn create(&self, input: NewInstance) -> Result<InstanceRow>;
    async fn update(&self, id: i64, changes: InstanceChanges) -> Result<InstanceRow>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct Store {
    pub command: Command,
    pub query: Query,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            command: Command(pool.clone()),
            query: Query(pool),
        }
    }
}

#[async_trait::async_trait]
impl ScheduleStore for Store {
    async fn list(&self, start: Date, end: Date) -> Result<Vec<InstanceRow>> {
        Ok(self.query.list_instances(start, end).await?)
    }

    async fn list_unscheduled(&self) -> Result<Vec<InstanceRow>> {
        Ok(self.query.list_unscheduled().await?)
    }

    async fn create(&self, input: NewInstance) -> Result<InstanceRow> {
        self.command.create_instance(input).await
    }

    async fn update(&self, id: i64, changes: InstanceChanges) -> Result<InstanceRow> {
        self.command.update_instance(id, changes).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.command.delete_instance(id).await
    }
}
