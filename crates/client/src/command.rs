use poolservice_db::table::Client;
use poolservice_shared::{
    Money,
    input::{self, Field},
    invalid,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{Date, OffsetDateTime};
use validator::Validate;

use crate::ClientRow;

/// Client form as posted by the browser. Every field is optional and may be
/// an empty string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientPayload {
    pub name: Option<Field>,
    pub phone: Option<Field>,
    pub address: Option<Field>,
    pub neighborhood: Option<Field>,
    pub geo_lat: Option<Field>,
    pub geo_lng: Option<Field>,
    pub fixed_price: Option<Field>,
    pub payment_due_day: Option<Field>,
    pub last_sand_change: Option<Field>,
    pub active: Option<Field>,
}

#[derive(Debug, Clone, Validate)]
pub struct ClientInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub geo_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub geo_lng: Option<f64>,
    pub fixed_price: Option<Money>,
    #[validate(range(min = 1, max = 31))]
    pub payment_due_day: Option<i32>,
    pub last_sand_change: Option<Date>,
    /// `None` means recurring on create and "keep the stored flag" on update.
    pub active: Option<bool>,
}

impl ClientInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
            address: None,
            neighborhood: None,
            geo_lat: None,
            geo_lng: None,
            fixed_price: None,
            payment_due_day: None,
            last_sand_change: None,
            active: None,
        }
    }
}

impl TryFrom<ClientPayload> for ClientInput {
    type Error = poolservice_shared::Error;

    fn try_from(payload: ClientPayload) -> Result<Self, Self::Error> {
        let name = input::text(payload.name)
            .map(|name| name.trim().to_owned())
            .unwrap_or_default();

        let fixed_price = input::parse::<Money>(payload.fixed_price, "fixed_price")?;
        if fixed_price.is_some_and(|price| price.is_negative()) {
            invalid!("fixed_price must not be negative");
        }

        Ok(Self {
            name,
            phone: input::text(payload.phone),
            address: input::text(payload.address),
            neighborhood: input::text(payload.neighborhood),
            geo_lat: input::parse(payload.geo_lat, "geo_lat")?,
            geo_lng: input::parse(payload.geo_lng, "geo_lng")?,
            fixed_price,
            payment_due_day: input::parse(payload.payment_due_day, "payment_due_day")?,
            last_sand_change: input::date(payload.last_sand_change)?,
            active: input::flag(payload.active, "active")?,
        })
    }
}

#[derive(Clone)]
pub struct Command(pub SqlitePool);

impl Command {
    #[tracing::instrument(skip_all, fields(name = %input.name))]
    pub async fn create(&self, input: ClientInput) -> poolservice_shared::Result<ClientRow> {
        input.validate()?;

        let statement = Query::insert()
            .into_table(Client::Table)
            .columns([
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
            ])
            .values_panic([
                input.name.into(),
                input.phone.into(),
                input.address.into(),
                input.neighborhood.into(),
                input.geo_lat.into(),
                input.geo_lng.into(),
                input.fixed_price.map(|v| v.to_string()).into(),
                input.payment_due_day.into(),
                input
                    .last_sand_change
                    .map(poolservice_shared::format_date)
                    .into(),
                input.active.unwrap_or(true).into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .returning_all()
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ClientRow, _>(&sql, values)
            .fetch_one(&self.0)
            .await?)
    }

    /// Replaces every editable field of the client. The active flag is only
    /// written when the input carries one.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ClientInput) -> poolservice_shared::Result<ClientRow> {
        input.validate()?;

        let mut statement = Query::update();
        statement
            .table(Client::Table)
            .values([
                (Client::Name, input.name.into()),
                (Client::Phone, input.phone.into()),
                (Client::Address, input.address.into()),
                (Client::Neighborhood, input.neighborhood.into()),
                (Client::GeoLat, input.geo_lat.into()),
                (Client::GeoLng, input.geo_lng.into()),
                (
                    Client::FixedPrice,
                    input.fixed_price.map(|v| v.to_string()).into(),
                ),
                (Client::PaymentDueDay, input.payment_due_day.into()),
                (
                    Client::LastSandChange,
                    input
                        .last_sand_change
                        .map(poolservice_shared::format_date)
                        .into(),
                ),
            ])
            .and_where(Expr::col(Client::Id).eq(id))
            .returning_all();

        if let Some(active) = input.active {
            statement.value(Client::Active, active);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, ClientRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .ok_or(poolservice_shared::Error::NotFound("client"))
    }

    /// Deletes the client together with its templates and instances.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> poolservice_shared::Result<()> {
        let statement = Query::delete()
            .from_table(Client::Table)
            .and_where(Expr::col(Client::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            return Err(poolservice_shared::Error::NotFound("client"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn payload(json: &str) -> ClientPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_strings_become_none() {
        let input = ClientInput::try_from(payload(
            r#"{"name": " Maria ", "phone": "", "fixed_price": "", "payment_due_day": "", "last_sand_change": "", "geo_lat": ""}"#,
        ))
        .unwrap();

        assert_eq!(input.name, "Maria");
        assert_eq!(input.phone, None);
        assert_eq!(input.fixed_price, None);
        assert_eq!(input.payment_due_day, None);
        assert_eq!(input.last_sand_change, None);
        assert_eq!(input.geo_lat, None);
        assert_eq!(input.active, None);
    }

    #[test]
    fn test_typed_fields() {
        let input = ClientInput::try_from(payload(
            r#"{"name": "Joao", "fixed_price": "150.00", "payment_due_day": 10, "last_sand_change": "2025-11-03", "active": false, "geo_lat": "-23.55"}"#,
        ))
        .unwrap();

        assert_eq!(input.fixed_price, Some(Money::new(15000, 2)));
        assert_eq!(input.payment_due_day, Some(10));
        assert_eq!(input.last_sand_change, Some(date!(2025 - 11 - 03)));
        assert_eq!(input.geo_lat, Some(-23.55));
        assert_eq!(input.active, Some(false));
    }

    #[test]
    fn test_validation() {
        let missing_name = ClientInput::try_from(payload(r#"{"phone": "123"}"#)).unwrap();
        assert!(missing_name.validate().is_err());

        let mut bad_day = ClientInput::new("Ana");
        bad_day.payment_due_day = Some(32);
        assert!(bad_day.validate().is_err());

        assert!(ClientInput::try_from(payload(r#"{"name": "Ana", "fixed_price": "-1"}"#)).is_err());
        assert!(ClientInput::try_from(payload(r#"{"name": "Ana", "fixed_price": "abc"}"#)).is_err());
    }
}
