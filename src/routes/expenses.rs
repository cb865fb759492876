use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use poolservice_finance::{ExpenseInput, ExpensePayload, ExpenseRow};
use poolservice_shared::{Error, input};
use serde::Deserialize;

use super::{AppState, message};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct RangeFilter {
    start_date: Option<String>,
    end_date: Option<String>,
}

/// The range applies only when both bounds are given.
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<RangeFilter>, AppError>,
) -> Result<Json<Vec<ExpenseRow>>> {
    let start = input::date(filter.start_date.map(Into::into))?;
    let end = input::date(filter.end_date.map(Into::into))?;

    Ok(Json(state.finance_query.list(start.zip(end)).await?))
}

pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ExpenseRow>> {
    let expense = state
        .finance_query
        .find(id)
        .await?
        .ok_or(Error::NotFound("expense"))?;

    Ok(Json(expense))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpensePayload>, AppError>,
) -> Result<(StatusCode, Json<ExpenseRow>)> {
    let input = ExpenseInput::try_from(payload)?;
    let expense = state.finance_command.create(input).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpensePayload>, AppError>,
) -> Result<Json<ExpenseRow>> {
    let input = ExpenseInput::try_from(payload)?;

    Ok(Json(state.finance_command.update(id, input).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<serde_json::Value>> {
    state.finance_command.delete(id).await?;

    Ok(message("Expense deleted successfully"))
}
