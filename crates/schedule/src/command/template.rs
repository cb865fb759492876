use poolservice_db::table::ServiceTemplate;
use poolservice_shared::{
    Error,
    input::{self, Field},
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

use crate::TemplateRow;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplatePayload {
    pub client_id: Option<Field>,
    pub day_of_week: Option<Field>,
    pub service_type: Option<Field>,
    pub is_active: Option<Field>,
}

/// `client_id` is only read on creation, a template never changes owner.
#[derive(Debug, Clone, Validate)]
pub struct TemplateInput {
    pub client_id: Option<i64>,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: i32,
    pub service_type: Option<String>,
    pub is_active: bool,
}

impl TemplateInput {
    pub fn new(client_id: i64, day_of_week: i32) -> Self {
        Self {
            client_id: Some(client_id),
            day_of_week,
            service_type: None,
            is_active: true,
        }
    }
}

impl TryFrom<TemplatePayload> for TemplateInput {
    type Error = Error;

    fn try_from(payload: TemplatePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: input::parse(payload.client_id, "client_id")?,
            day_of_week: input::required(
                input::parse(payload.day_of_week, "day_of_week")?,
                "day_of_week",
            )?,
            service_type: input::text(payload.service_type),
            is_active: input::flag(payload.is_active, "is_active")?.unwrap_or(true),
        })
    }
}

impl super::Command {
    #[tracing::instrument(skip(self))]
    pub async fn create_template(&self, input: TemplateInput) -> poolservice_shared::Result<TemplateRow> {
        input.validate()?;
        let client_id = input::required(input.client_id, "client_id")?;

        let statement = Query::insert()
            .into_table(ServiceTemplate::Table)
            .columns([
                ServiceTemplate::ClientId,
                ServiceTemplate::DayOfWeek,
                ServiceTemplate::ServiceType,
                ServiceTemplate::IsActive,
                ServiceTemplate::CreatedAt,
            ])
            .values_panic([
                client_id.into(),
                input.day_of_week.into(),
                input.service_type.into(),
                input.is_active.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .returning_all()
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, TemplateRow, _>(&sql, values)
            .fetch_one(&self.0)
            .await
            .map_err(|err| Error::missing_reference(err, "client"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_template(
        &self,
        id: i64,
        input: TemplateInput,
    ) -> poolservice_shared::Result<TemplateRow> {
        input.validate()?;

        let statement = Query::update()
            .table(ServiceTemplate::Table)
            .values([
                (ServiceTemplate::DayOfWeek, input.day_of_week.into()),
                (ServiceTemplate::ServiceType, input.service_type.into()),
                (ServiceTemplate::IsActive, input.is_active.into()),
            ])
            .and_where(Expr::col(ServiceTemplate::Id).eq(id))
            .returning_all()
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, TemplateRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .ok_or(Error::NotFound("template"))
    }

    /// Generated instances survive, their `template_id` is cleared.
    #[tracing::instrument(skip(self))]
    pub async fn delete_template(&self, id: i64) -> poolservice_shared::Result<()> {
        let statement = Query::delete()
            .from_table(ServiceTemplate::Table)
            .and_where(Expr::col(ServiceTemplate::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("template"));
        }

        Ok(())
    }
}
