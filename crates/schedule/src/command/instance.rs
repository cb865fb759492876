use poolservice_db::table::ServiceInstance;
use poolservice_shared::{
    Error, Money, Slot, Status, format_visit_start,
    input::{self, Field},
    invalid,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::{InstanceRow, query::fetch_instance};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstancePayload {
    pub client_id: Option<Field>,
    pub scheduled_date: Option<Field>,
    pub status: Option<Field>,
    pub visit_start: Option<Field>,
    pub price: Option<Field>,
}

fn price(field: Option<Field>) -> poolservice_shared::Result<Option<Money>> {
    let price = input::parse::<Money>(field, "price")?;
    if price.is_some_and(|price| price.is_negative()) {
        invalid!("price must not be negative");
    }

    Ok(price)
}

/// A one-off visit. `price` defaults to the client's fixed price.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstance {
    pub client_id: i64,
    pub scheduled_date: Slot,
    pub status: Status,
    pub visit_start: Option<PrimitiveDateTime>,
    pub price: Option<Money>,
}

impl NewInstance {
    pub fn new(client_id: i64, scheduled_date: Slot) -> Self {
        Self {
            client_id,
            scheduled_date,
            status: Status::Pending,
            visit_start: None,
            price: None,
        }
    }
}

impl TryFrom<InstancePayload> for NewInstance {
    type Error = Error;

    fn try_from(payload: InstancePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: input::required(
                input::parse(payload.client_id, "client_id")?,
                "client_id",
            )?,
            scheduled_date: input::required(
                input::slot(payload.scheduled_date)?,
                "scheduled_date",
            )?,
            status: input::parse(payload.status, "status")?.unwrap_or_default(),
            visit_start: input::timestamp(payload.visit_start)?,
            price: price(payload.price)?,
        })
    }
}

/// Partial update, `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceChanges {
    pub scheduled_date: Option<Slot>,
    pub status: Option<Status>,
    pub visit_start: Option<PrimitiveDateTime>,
    pub price: Option<Money>,
}

impl InstanceChanges {
    pub fn reschedule(slot: Slot) -> Self {
        Self {
            scheduled_date: Some(slot),
            ..Default::default()
        }
    }

    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<InstancePayload> for InstanceChanges {
    type Error = Error;

    fn try_from(payload: InstancePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            scheduled_date: input::slot(payload.scheduled_date)?,
            status: input::parse(payload.status, "status")?,
            visit_start: input::timestamp(payload.visit_start)?,
            price: price(payload.price)?,
        })
    }
}

impl super::Command {
    #[tracing::instrument(skip(self, input), fields(client_id = input.client_id, slot = %input.scheduled_date))]
    pub async fn create_instance(&self, input: NewInstance) -> poolservice_shared::Result<InstanceRow> {
        let mut tx = self.0.begin().await?;

        let fixed_price = sqlx::query_as::<_, (Option<Money>,)>(
            "SELECT fixed_price FROM client WHERE id = ?",
        )
        .bind(input.client_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::NotFound("client"))?
        .0;

        let statement = Query::insert()
            .into_table(ServiceInstance::Table)
            .columns([
                ServiceInstance::ClientId,
                ServiceInstance::ScheduledDate,
                ServiceInstance::Status,
                ServiceInstance::VisitStart,
                ServiceInstance::Price,
                ServiceInstance::CreatedAt,
            ])
            .values_panic([
                input.client_id.into(),
                input.scheduled_date.to_string().into(),
                input.status.to_string().into(),
                input.visit_start.map(format_visit_start).into(),
                input.price.or(fixed_price).map(|v| v.to_string()).into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .returning_col(ServiceInstance::Id)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&mut *tx)
            .await?;

        let row = fetch_instance(&mut *tx, id)
            .await?
            .ok_or(Error::NotFound("instance"))?;

        tx.commit().await?;

        Ok(row)
    }

    /// Updates only the fields set in `changes`. The template is never
    /// touched.
    #[tracing::instrument(skip(self))]
    pub async fn update_instance(
        &self,
        id: i64,
        changes: InstanceChanges,
    ) -> poolservice_shared::Result<InstanceRow> {
        let mut values: Vec<(ServiceInstance, Expr)> = vec![];

        if let Some(slot) = changes.scheduled_date {
            values.push((ServiceInstance::ScheduledDate, slot.to_string().into()));
        }

        if let Some(status) = changes.status {
            values.push((ServiceInstance::Status, status.to_string().into()));
        }

        if let Some(visit_start) = changes.visit_start {
            values.push((
                ServiceInstance::VisitStart,
                format_visit_start(visit_start).into(),
            ));
        }

        if let Some(price) = changes.price {
            values.push((ServiceInstance::Price, price.to_string().into()));
        }

        if !values.is_empty() {
            let statement = Query::update()
                .table(ServiceInstance::Table)
                .values(values)
                .and_where(Expr::col(ServiceInstance::Id).eq(id))
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&self.0).await?;
        }

        fetch_instance(&self.0, id)
            .await?
            .ok_or(Error::NotFound("instance"))
    }

    /// Linked expenses are kept with their `service_instance_id` cleared.
    #[tracing::instrument(skip(self))]
    pub async fn delete_instance(&self, id: i64) -> poolservice_shared::Result<()> {
        let statement = Query::delete()
            .from_table(ServiceInstance::Table)
            .and_where(Expr::col(ServiceInstance::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("instance"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn payload(json: &str) -> InstancePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_new_instance_defaults() {
        let input =
            NewInstance::try_from(payload(r#"{"client_id": 3, "scheduled_date": "2026-02-18", "price": ""}"#))
                .unwrap();

        assert_eq!(input.client_id, 3);
        assert_eq!(input.scheduled_date, Slot::Day(date!(2026 - 02 - 18)));
        assert_eq!(input.status, Status::Pending);
        assert_eq!(input.price, None);
        assert_eq!(input.visit_start, None);
    }

    #[test]
    fn test_new_instance_requires_client_and_date() {
        assert!(NewInstance::try_from(payload(r#"{"scheduled_date": "2026-02-18"}"#)).is_err());
        assert!(NewInstance::try_from(payload(r#"{"client_id": 3, "scheduled_date": ""}"#)).is_err());
    }

    #[test]
    fn test_changes_keep_unset_fields() {
        let changes = InstanceChanges::try_from(payload(
            r#"{"status": "Completed", "visit_start": "2026-02-12T10:00", "price": "", "scheduled_date": null}"#,
        ))
        .unwrap();

        assert_eq!(changes.scheduled_date, None);
        assert_eq!(changes.status, Some(Status::Completed));
        assert_eq!(changes.visit_start, Some(datetime!(2026-02-12 10:00)));
        assert_eq!(changes.price, None);
        assert!(!changes.is_empty());

        assert!(InstanceChanges::try_from(payload("{}")).unwrap().is_empty());
    }

    #[test]
    fn test_unscheduled_sentinel_is_accepted() {
        let changes =
            InstanceChanges::try_from(payload(r#"{"scheduled_date": "1970-01-01"}"#)).unwrap();

        assert_eq!(changes, InstanceChanges::reschedule(Slot::Unscheduled));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(InstanceChanges::try_from(payload(r#"{"price": "-10"}"#)).is_err());
    }
}
