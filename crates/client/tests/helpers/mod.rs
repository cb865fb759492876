use std::{path::PathBuf, str::FromStr};

use poolservice_client::{ClientInput, ClientRow, Command};
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
    cmd: &Command,
    name: impl Into<String>,
    fixed_price: Option<Money>,
) -> anyhow::Result<ClientRow> {
    let mut input = ClientInput::new(name);
    input.fixed_price = fixed_price;

    Ok(cmd.create(input).await?)
}
