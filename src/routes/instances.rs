use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use poolservice_schedule::{InstanceChanges, InstancePayload, InstanceRow, NewInstance};
use poolservice_shared::{
    Error,
    input::{self, Field},
};
use serde::{Deserialize, Serialize};

use super::{AppState, message};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct RangeFilter {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneratePayload {
    start_date: Option<Field>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    message: &'static str,
    created: u32,
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<RangeFilter>, AppError>,
) -> Result<Json<Vec<InstanceRow>>> {
    let start = input::date(filter.start_date.map(Into::into))?;
    let end = input::date(filter.end_date.map(Into::into))?;

    let (Some(start), Some(end)) = (start, end) else {
        return Err(AppError::BadRequest(
            "start_date and end_date are required".to_owned(),
        ));
    };

    Ok(Json(state.schedule_query.list_instances(start, end).await?))
}

/// Visits of the current day in the business timezone.
pub async fn today(State(state): State<AppState>) -> Result<Json<Vec<InstanceRow>>> {
    let today = state.today();

    Ok(Json(state.schedule_query.list_for_day(today).await?))
}

pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<InstanceRow>> {
    let instance = state
        .schedule_query
        .find_instance(id)
        .await?
        .ok_or(Error::NotFound("instance"))?;

    Ok(Json(instance))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<InstancePayload>, AppError>,
) -> Result<(StatusCode, Json<InstanceRow>)> {
    let input = NewInstance::try_from(payload)?;
    let instance = state.schedule_command.create_instance(input).await?;

    Ok((StatusCode::CREATED, Json(instance)))
}

#[tracing::instrument(skip_all)]
pub async fn generate(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<GeneratePayload>, AppError>,
) -> Result<Json<GenerateResponse>> {
    let anchor = input::required(input::date(payload.start_date)?, "start_date")?;
    let generated = state.schedule_command.generate_week(anchor).await?;

    Ok(Json(GenerateResponse {
        message: "Week generated successfully",
        created: generated.created,
    }))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<InstancePayload>, AppError>,
) -> Result<Json<InstanceRow>> {
    let changes = InstanceChanges::try_from(payload)?;

    Ok(Json(state.schedule_command.update_instance(id, changes).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<serde_json::Value>> {
    state.schedule_command.delete_instance(id).await?;

    Ok(message("Instance deleted successfully"))
}
