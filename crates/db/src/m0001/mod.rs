mod client;
mod expense;
mod service_instance;
mod service_template;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "poolservice",
    "m0001",
    vec_box![],
    vec_box![
        client::CreateTable,
        client::CreateIdx1,
        service_template::CreateTable,
        service_template::CreateIdx1,
        service_template::CreateIdx2,
        service_instance::CreateTable,
        service_instance::CreateIdx1,
        service_instance::CreateIdx2,
        service_instance::CreateIdx3,
        expense::CreateTable,
        expense::CreateIdx1
    ]
);
