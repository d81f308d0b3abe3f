use sea_query::{ColumnDef, Expr, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::Cancellation;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Cancellation::Table)
        .col(
            ColumnDef::new(Cancellation::ClientId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Cancellation::OrderId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(Cancellation::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(Cancellation::CreditApplied)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Cancellation::CancelledAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .primary_key(
            Index::create()
                .col(Cancellation::ClientId)
                .col(Cancellation::Date),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Cancellation::Table).to_owned()
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
