use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use poolservice_finance::Dashboard;
use poolservice_shared::{month_bounds, month_bounds_of};
use serde::Deserialize;

use super::AppState;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct MonthFilter {
    month: Option<String>,
}

/// GET /dashboard?month=YYYY-MM, the current month when omitted.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<MonthFilter>, AppError>,
) -> Result<Json<Dashboard>> {
    let today = state.today();

    let (start, end) = match filter.month.as_deref().map(str::trim) {
        Some(month) if !month.is_empty() => month_bounds(month)?,
        _ => month_bounds_of(today),
    };

    Ok(Json(state.finance_query.dashboard(start, end, today).await?))
}
