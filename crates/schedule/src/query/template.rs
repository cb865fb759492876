use poolservice_db::table::ServiceTemplate;
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TemplateRow {
    pub id: i64,
    pub client_id: i64,
    pub day_of_week: i32,
    pub service_type: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

pub(crate) fn columns() -> [ServiceTemplate; 6] {
    [
        ServiceTemplate::Id,
        ServiceTemplate::ClientId,
        ServiceTemplate::DayOfWeek,
        ServiceTemplate::ServiceType,
        ServiceTemplate::IsActive,
        ServiceTemplate::CreatedAt,
    ]
}

impl super::Query {
    /// Templates ordered by weekday, optionally restricted to one client.
    pub async fn list_templates(&self, client_id: Option<i64>) -> anyhow::Result<Vec<TemplateRow>> {
        let mut statement = sea_query::Query::select()
            .columns(columns())
            .from(ServiceTemplate::Table)
            .order_by(ServiceTemplate::DayOfWeek, Order::Asc)
            .order_by(ServiceTemplate::Id, Order::Asc)
            .to_owned();

        if let Some(client_id) = client_id {
            statement.and_where(Expr::col(ServiceTemplate::ClientId).eq(client_id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TemplateRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn find_template(&self, id: i64) -> anyhow::Result<Option<TemplateRow>> {
        let statement = sea_query::Query::select()
            .columns(columns())
            .from(ServiceTemplate::Table)
            .and_where(Expr::col(ServiceTemplate::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TemplateRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}
