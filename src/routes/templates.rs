use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use poolservice_schedule::{TemplateInput, TemplatePayload, TemplateRow};
use poolservice_shared::{Error, input};
use serde::Deserialize;

use super::{AppState, message};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct TemplateFilter {
    client_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<TemplateFilter>, AppError>,
) -> Result<Json<Vec<TemplateRow>>> {
    let client_id = input::parse(filter.client_id.map(Into::into), "client_id")?;

    Ok(Json(state.schedule_query.list_templates(client_id).await?))
}

pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<TemplateRow>> {
    let template = state
        .schedule_query
        .find_template(id)
        .await?
        .ok_or(Error::NotFound("template"))?;

    Ok(Json(template))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<TemplatePayload>, AppError>,
) -> Result<(StatusCode, Json<TemplateRow>)> {
    let input = TemplateInput::try_from(payload)?;
    let template = state.schedule_command.create_template(input).await?;

    Ok((StatusCode::CREATED, Json(template)))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<TemplatePayload>, AppError>,
) -> Result<Json<TemplateRow>> {
    let input = TemplateInput::try_from(payload)?;

    Ok(Json(state.schedule_command.update_template(id, input).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<serde_json::Value>> {
    state.schedule_command.delete_template(id).await?;

    Ok(message("Template deleted successfully"))
}
