use std::{path::PathBuf, str::FromStr};

use poolservice_client::ClientInput;
use poolservice_shared::Money;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    poolservice_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

#[allow(dead_code)]
pub async fn create_client(
    pool: &SqlitePool,
    name: impl Into<String>,
    fixed_price: Option<Money>,
    payment_due_day: Option<i32>,
) -> anyhow::Result<i64> {
    let mut input = ClientInput::new(name);
    input.fixed_price = fixed_price;
    input.payment_due_day = payment_due_day;
    let row = poolservice_client::Command(pool.clone()).create(input).await?;

    Ok(row.id)
}
