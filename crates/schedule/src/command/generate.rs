use poolservice_db::table::ServiceInstance;
use poolservice_shared::{Money, Status, format_date, week_from, weekday_index};
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqliteConnection, prelude::FromRow};
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub created: u32,
}

#[derive(Debug, FromRow)]
struct DueTemplate {
    id: i64,
    client_id: i64,
    service_type: Option<String>,
    fixed_price: Option<Money>,
}

impl super::Command {
    /// Materializes the week starting at `anchor` from the active templates.
    ///
    /// For each of the 7 days, every active template whose weekday matches
    /// gets a `Pending` instance unless one already exists for the same
    /// `(template_id, scheduled_date)`. The sweep is a single transaction:
    /// either every missing instance is created or none is.
    #[tracing::instrument(skip(self, anchor), fields(anchor = %format_date(anchor)))]
    pub async fn generate_week(&self, anchor: Date) -> poolservice_shared::Result<Generated> {
        let days = week_from(anchor)?;
        let mut tx = self.0.begin().await?;

        match sweep(&mut tx, &days).await {
            Ok(created) => {
                tx.commit().await?;
                tracing::info!(created, "week generated");

                Ok(Generated { created })
            }
            Err(err) => {
                tracing::error!(err = %err, "week generation rolled back");
                tx.rollback().await?;

                Err(err.into())
            }
        }
    }
}

async fn sweep(conn: &mut SqliteConnection, days: &[Date; 7]) -> Result<u32, sqlx::Error> {
    let mut created = 0;

    for day in days {
        let templates = sqlx::query_as::<_, DueTemplate>(
            r#"
            SELECT t.id, t.client_id, t.service_type, c.fixed_price
            FROM service_template t
            JOIN client c ON c.id = t.client_id
            WHERE t.day_of_week = ? AND t.is_active = 1
            ORDER BY t.id
            "#,
        )
        .bind(weekday_index(*day) as i64)
        .fetch_all(&mut *conn)
        .await?;

        let scheduled_date = format_date(*day);

        for template in templates {
            let existing = sqlx::query_scalar::<_, i64>(
                "SELECT id FROM service_instance WHERE template_id = ? AND scheduled_date = ? LIMIT 1",
            )
            .bind(template.id)
            .bind(&scheduled_date)
            .fetch_optional(&mut *conn)
            .await?;

            if existing.is_some() {
                continue;
            }

            let statement = Query::insert()
                .into_table(ServiceInstance::Table)
                .columns([
                    ServiceInstance::TemplateId,
                    ServiceInstance::ClientId,
                    ServiceInstance::ScheduledDate,
                    ServiceInstance::Status,
                    ServiceInstance::Price,
                    ServiceInstance::ServiceType,
                    ServiceInstance::CreatedAt,
                ])
                .values_panic([
                    template.id.into(),
                    template.client_id.into(),
                    scheduled_date.clone().into(),
                    Status::Pending.to_string().into(),
                    template.fixed_price.map(|v| v.to_string()).into(),
                    template.service_type.into(),
                    OffsetDateTime::now_utc().unix_timestamp().into(),
                ])
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *conn).await?;

            created += 1;
        }
    }

    Ok(created)
}
