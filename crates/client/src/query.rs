use poolservice_db::table::Client;
use poolservice_shared::Money;
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;
use time::Date;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub geo_lat: Option<f64>,
    pub geo_lng: Option<f64>,
    pub fixed_price: Option<Money>,
    pub payment_due_day: Option<i32>,
    pub last_sand_change: Option<Date>,
    pub active: bool,
    pub created_at: i64,
}

fn columns() -> [Client; 12] {
    [
        Client::Id,
        Client::Name,
        Client::Phone,
        Client::Address,
        Client::Neighborhood,
        Client::GeoLat,
        Client::GeoLng,
        Client::FixedPrice,
        Client::PaymentDueDay,
        Client::LastSandChange,
        Client::Active,
        Client::CreatedAt,
    ]
}

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);

impl Query {
    pub async fn list(&self) -> anyhow::Result<Vec<ClientRow>> {
        let statement = sea_query::Query::select()
            .columns(columns())
            .from(Client::Table)
            .order_by(Client::Name, Order::Asc)
            .order_by(Client::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ClientRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn find(&self, id: i64) -> anyhow::Result<Option<ClientRow>> {
        let statement = sea_query::Query::select()
            .columns(columns())
            .from(Client::Table)
            .and_where(Expr::col(Client::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ClientRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}
