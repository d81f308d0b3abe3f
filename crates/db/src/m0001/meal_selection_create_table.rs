use sea_query::{ColumnDef, Expr, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::MealSelection;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealSelection::Table)
        .col(
            ColumnDef::new(MealSelection::ClientId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealSelection::OrderId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealSelection::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(MealSelection::Meal).string().not_null())
        .col(
            ColumnDef::new(MealSelection::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .primary_key(
            Index::create()
                .col(MealSelection::ClientId)
                .col(MealSelection::Date),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealSelection::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
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
