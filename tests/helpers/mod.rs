#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use poolservice::Config;
use serde_json::Value;
use sqlx::SqlitePool;
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub config: Config,
    _dir: TempDir,
}

/// Fresh database in a temp dir, migrated, behind the full router.
pub async fn setup_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let mut config = Config::default();
    config.database.url = format!("sqlite:{}", dir.child("api.db").display());

    let pool = poolservice::db::create_pool(&config.database.url, 2).await?;
    poolservice::migrate::run_migrations(&pool).await?;

    let router = poolservice::create_app(config.clone(), pool.clone())?;

    Ok(TestApp {
        router,
        pool,
        config,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, body))
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates a client and returns its id.
    pub async fn create_client(&self, name: &str, fixed_price: &str) -> anyhow::Result<i64> {
        let (status, body) = self
            .post(
                "/clients",
                serde_json::json!({ "name": name, "fixed_price": fixed_price }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("client id missing in {body}"))
    }
}
