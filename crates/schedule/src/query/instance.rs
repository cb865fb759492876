use poolservice_shared::{DRAFT_DATE, Money, Slot, Status, format_date};
use serde::Serialize;
use sqlx::{SqliteExecutor, prelude::FromRow};
use time::{Date, PrimitiveDateTime};

/// A service instance joined with the client it belongs to. `service_type`
/// falls back to the template's when the instance carries none.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct InstanceRow {
    pub id: i64,
    pub template_id: Option<i64>,
    pub client_id: i64,
    pub scheduled_date: Slot,
    pub status: Status,
    #[serde(with = "poolservice_shared::visit_time::option")]
    pub visit_start: Option<PrimitiveDateTime>,
    pub price: Option<Money>,
    pub service_type: Option<String>,
    pub client_name: String,
    pub address: Option<String>,
    pub created_at: i64,
}

const SELECT_INSTANCE: &str = r#"
    SELECT i.id, i.template_id, i.client_id, i.scheduled_date, i.status, i.visit_start,
           i.price, COALESCE(i.service_type, t.service_type) AS service_type,
           c.name AS client_name, c.address AS address, i.created_at
    FROM service_instance i
    JOIN client c ON c.id = i.client_id
    LEFT JOIN service_template t ON t.id = i.template_id
"#;

pub(crate) async fn fetch_instance<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<InstanceRow>, sqlx::Error> {
    let sql = format!("{SELECT_INSTANCE} WHERE i.id = ? LIMIT 1");

    sqlx::query_as::<_, InstanceRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

impl super::Query {
    /// Instances with `scheduled_date` within `start..=end`, ordered by date
    /// then id.
    pub async fn list_instances(&self, start: Date, end: Date) -> anyhow::Result<Vec<InstanceRow>> {
        let sql = format!(
            "{SELECT_INSTANCE} WHERE i.scheduled_date BETWEEN ? AND ? ORDER BY i.scheduled_date, i.id"
        );

        Ok(sqlx::query_as::<_, InstanceRow>(&sql)
            .bind(format_date(start))
            .bind(format_date(end))
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn list_unscheduled(&self) -> anyhow::Result<Vec<InstanceRow>> {
        self.list_instances(DRAFT_DATE, DRAFT_DATE).await
    }

    pub async fn list_for_day(&self, day: Date) -> anyhow::Result<Vec<InstanceRow>> {
        self.list_instances(day, day).await
    }

    pub async fn find_instance(&self, id: i64) -> anyhow::Result<Option<InstanceRow>> {
        Ok(fetch_instance(&self.0, id).await?)
    }
}
