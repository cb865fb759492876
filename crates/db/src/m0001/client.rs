use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Client;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Client::Table)
        .col(
            ColumnDef::new(Client::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Client::Name)
                .string()
                .not_null()
                .string_len(120),
        )
        .col(ColumnDef::new(Client::Phone).string().string_len(40))
        .col(ColumnDef::new(Client::Address).string().string_len(255))
        .col(ColumnDef::new(Client::Neighborhood).string().string_len(120))
        .col(ColumnDef::new(Client::GeoLat).double())
        .col(ColumnDef::new(Client::GeoLng).double())
        .col(ColumnDef::new(Client::FixedPrice).string().string_len(32))
        .col(ColumnDef::new(Client::PaymentDueDay).integer())
        .col(ColumnDef::new(Client::LastSandChange).string().string_len(10))
        .col(
            ColumnDef::new(Client::Active)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(ColumnDef::new(Client::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Client::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_client_name")
        .table(Client::Table)
        .col(Client::Name)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_client_name")
        .table(Client::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
