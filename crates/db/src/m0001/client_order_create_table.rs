use sea_query::{ColumnDef, Expr, Table, TableCreateStatement, TableDropStatement};

use crate::table::ClientOrder;

pub struct Operation;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(ClientOrder::Table)
        .col(
            ColumnDef::new(ClientOrder::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(ClientOrder::ClientId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(ClientOrder::ClientName).string().not_null())
        .col(
            ColumnDef::new(ClientOrder::StartDate)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(ClientOrder::Duration).integer().not_null())
        .col(ColumnDef::new(ClientOrder::DaysCount).integer().not_null())
        .col(ColumnDef::new(ClientOrder::EndDate).string().string_len(10))
        .col(
            ColumnDef::new(ClientOrder::CreditDays)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(ClientOrder::Status)
                .string()
                .not_null()
                .string_len(16),
        )
        .col(
            ColumnDef::new(ClientOrder::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(ClientOrder::Table).to_owned()
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
