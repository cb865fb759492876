use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::config::Config;

mod clients;
mod dashboard;
mod expenses;
mod health;
mod instances;
mod templates;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub client_command: poolservice_client::Command,
    pub client_query: poolservice_client::Query,
    pub schedule_command: poolservice_schedule::Command,
    pub schedule_query: poolservice_schedule::Query,
    pub finance_command: poolservice_finance::Command,
    pub finance_query: poolservice_finance::Query,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config,
            client_command: poolservice_client::Command(pool.clone()),
            client_query: poolservice_client::Query(pool.clone()),
            schedule_command: poolservice_schedule::Command(pool.clone()),
            schedule_query: poolservice_schedule::Query(pool.clone()),
            finance_command: poolservice_finance::Command(pool.clone()),
            finance_query: poolservice_finance::Query(pool.clone()),
            pool,
        }
    }

    /// Today's date in the configured business timezone.
    pub fn today(&self) -> time::Date {
        poolservice_shared::today(&self.config.business.timezone)
    }
}

/// `{ "message": ... }` body returned by deletes and the root endpoint.
pub(crate) fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

pub async fn index() -> impl IntoResponse {
    message("PoolService Manager API is running")
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/", get(index))
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::find)
                .put(clients::update)
                .delete(clients::delete),
        )
        .route("/templates", get(templates::list).post(templates::create))
        .route(
            "/templates/{id}",
            get(templates::find)
                .put(templates::update)
                .delete(templates::delete),
        )
        .route("/instances", get(instances::list).post(instances::create))
        .route("/instances/generate", post(instances::generate))
        .route("/instances/today", get(instances::today))
        .route(
            "/instances/{id}",
            get(instances::find)
                .put(instances::update)
                .delete(instances::delete),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::find)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/dashboard", get(dashboard::show))
        .with_state(app_state)
}
