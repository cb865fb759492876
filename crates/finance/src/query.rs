use poolservice_db::table::Expense;
use poolservice_shared::{Money, format_date};
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;
use time::Date;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub service_instance_id: Option<i64>,
    pub description: String,
    pub amount: Money,
    pub expense_date: Date,
    pub category: Option<String>,
    pub created_at: i64,
}

fn columns() -> [Expense; 7] {
    [
        Expense::Id,
        Expense::ServiceInstanceId,
        Expense::Description,
        Expense::Amount,
        Expense::ExpenseDate,
        Expense::Category,
        Expense::CreatedAt,
    ]
}

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Query {
    /// Most recent first. `range` is inclusive on both ends.
    pub async fn list(&self, range: Option<(Date, Date)>) -> anyhow::Result<Vec<ExpenseRow>> {
        let mut statement = sea_query::Query::select()
            .columns(columns())
            .from(Expense::Table)
            .order_by(Expense::ExpenseDate, Order::Desc)
            .order_by(Expense::Id, Order::Desc)
            .to_owned();

        if let Some((start, end)) = range {
            statement.and_where(
                Expr::col(Expense::ExpenseDate).between(format_date(start), format_date(end)),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn find(&self, id: i64) -> anyhow::Result<Option<ExpenseRow>> {
        let statement = sea_query::Query::select()
            .columns(columns())
            .from(Expense::Table)
            .and_where(Expr::col(Expense::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}
