use std::{path::PathBuf, str::FromStr};

use poolservice_client::ClientInput;
use poolservice_schedule::{Command, TemplateInput, TemplateRow};
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
) -> anyhow::Result<i64> {
    let mut input = ClientInput::new(name);
    input.fixed_price = fixed_price;
    let row = poolservice_client::Command(pool.clone()).create(input).await?;

    Ok(row.id)
}

#[allow(dead_code)]
pub async fn create_template(
    cmd: &Command,
    client_id: i64,
    day_of_week: i32,
    is_active: bool,
) -> anyhow::Result<TemplateRow> {
    let mut input = TemplateInput::new(client_id, day_of_week);
    input.service_type = Some("Manutenção".to_owned());
    input.is_active = is_active;

    Ok(cmd.create_template(input).await?)
}

#[allow(dead_code)]
pub async fn count_instances(pool: &SqlitePool) -> anyhow::Result<i64> {
    Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM service_instance")
        .fetch_one(pool)
        .await?)
}
