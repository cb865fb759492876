use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use poolservice_client::{ClientInput, ClientPayload, ClientRow};
use poolservice_shared::Error;

use super::{AppState, message};
use crate::error::{AppError, Result};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClientRow>>> {
    Ok(Json(state.client_query.list().await?))
}

pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ClientRow>> {
    let client = state
        .client_query
        .find(id)
        .await?
        .ok_or(Error::NotFound("client"))?;

    Ok(Json(client))
}

#[tracing::instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ClientPayload>, AppError>,
) -> Result<(StatusCode, Json<ClientRow>)> {
    let input = ClientInput::try_from(payload)?;
    let client = state.client_command.create(input).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ClientPayload>, AppError>,
) -> Result<Json<ClientRow>> {
    let input = ClientInput::try_from(payload)?;

    Ok(Json(state.client_command.update(id, input).await?))
}

#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<serde_json::Value>> {
    state.client_command.delete(id).await?;

    Ok(message("Client deleted successfully"))
}
