use poolservice_db::table::Expense;
use poolservice_shared::{
    Error, Money, format_date,
    input::{self, Field},
    invalid,
};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{Date, OffsetDateTime};
use validator::Validate;

use crate::ExpenseRow;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExpensePayload {
    pub service_instance_id: Option<Field>,
    pub description: Option<Field>,
    pub amount: Option<Field>,
    pub expense_date: Option<Field>,
    pub category: Option<Field>,
}

/// `service_instance_id` is only read on creation.
#[derive(Debug, Clone, Validate)]
pub struct ExpenseInput {
    pub service_instance_id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    pub amount: Money,
    pub expense_date: Date,
    #[validate(length(max = 60))]
    pub category: Option<String>,
}

impl ExpenseInput {
    pub fn new(description: impl Into<String>, amount: Money, expense_date: Date) -> Self {
        Self {
            service_instance_id: None,
            description: description.into(),
            amount,
            expense_date,
            category: None,
        }
    }
}

impl TryFrom<ExpensePayload> for ExpenseInput {
    type Error = Error;

    fn try_from(payload: ExpensePayload) -> Result<Self, Self::Error> {
        let amount = input::required(input::parse::<Money>(payload.amount, "amount")?, "amount")?;
        if amount.is_negative() {
            invalid!("amount must not be negative");
        }

        Ok(Self {
            service_instance_id: input::parse(payload.service_instance_id, "service_instance_id")?,
            description: input::text(payload.description)
                .map(|d| d.trim().to_owned())
                .unwrap_or_default(),
            amount,
            expense_date: input::required(input::date(payload.expense_date)?, "expense_date")?,
            category: input::text(payload.category),
        })
    }
}

#[derive(Clone)]
pub struct Command(pub SqlitePool);

impl Command {
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: ExpenseInput) -> poolservice_shared::Result<ExpenseRow> {
        input.validate()?;

        let statement = Query::insert()
            .into_table(Expense::Table)
            .columns([
                Expense::ServiceInstanceId,
                Expense::Description,
                Expense::Amount,
                Expense::ExpenseDate,
                Expense::Category,
                Expense::CreatedAt,
            ])
            .values_panic([
                input.service_instance_id.into(),
                input.description.into(),
                input.amount.to_string().into(),
                format_date(input.expense_date).into(),
                input.category.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .returning_all()
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_one(&self.0)
            .await
            .map_err(|err| Error::missing_reference(err, "instance"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i64, input: ExpenseInput) -> poolservice_shared::Result<ExpenseRow> {
        input.validate()?;

        let statement = Query::update()
            .table(Expense::Table)
            .values([
                (Expense::Description, input.description.into()),
                (Expense::Amount, input.amount.to_string().into()),
                (Expense::ExpenseDate, format_date(input.expense_date).into()),
                (Expense::Category, input.category.into()),
            ])
            .and_where(Expr::col(Expense::Id).eq(id))
            .returning_all()
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, ExpenseRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .ok_or(Error::NotFound("expense"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> poolservice_shared::Result<()> {
        let statement = Query::delete()
            .from_table(Expense::Table)
            .and_where(Expr::col(Expense::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("expense"));
        }

        Ok(())
    }
}
