use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::MenuItem;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MenuItem::Table)
        .col(
            ColumnDef::new(MenuItem::Id)
                .string()
                .not_null()
                .string_len(64)
                .primary_key(),
        )
        .col(ColumnDef::new(MenuItem::Name).string().not_null())
        .col(ColumnDef::new(MenuItem::Description).text())
        .col(ColumnDef::new(MenuItem::Category).string().string_len(64))
        .col(ColumnDef::new(MenuItem::MealType).string().string_len(15))
        .col(ColumnDef::new(MenuItem::DiningHallId).string().string_len(32))
        .col(
            ColumnDef::new(MenuItem::MenuDate)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(MenuItem::Calories).double())
        .col(ColumnDef::new(MenuItem::Protein).double())
        .col(ColumnDef::new(MenuItem::Carbs).double())
        .col(ColumnDef::new(MenuItem::Fat).double())
        .col(
            ColumnDef::new(MenuItem::Tags)
                .text()
                .not_null()
                .default("[]"),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MenuItem::Table).to_owned()
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
        .name("idx_menu_item_date_meal")
        .table(MenuItem::Table)
        .col(MenuItem::MenuDate)
        .col(MenuItem::MealType)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_menu_item_date_meal")
        .table(MenuItem::Table)
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
