use std::collections::HashSet;
use std::str::FromStr;

use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use sqlx::prelude::FromRow;
use time::Date;

use mealdrop_db::table::{Cancellation, ClientOrder, MealSelection};
use mealdrop_shared::date::{DateRange, format_iso, parse_iso};

use crate::{Cadence, CancellationRecord, Order, OrderStatus};

/// The backing store caps IN clauses, so compound-key lookups are batched.
const KEY_CHUNK: usize = 10;

#[derive(Default, FromRow)]
struct OrderRow {
    id: String,
    client_id: String,
    client_name: String,
    start_date: String,
    duration: i64,
    days_count: i64,
    end_date: Option<String>,
    credit_days: i64,
    status: String,
}

#[derive(Default, FromRow)]
struct CancellationRow {
    client_id: String,
    order_id: String,
    date: String,
    credit_applied: bool,
    cancelled_at: String,
}

fn order_from_row(row: OrderRow) -> mealdrop_shared::Result<Order> {
    let Some(cadence) = Cadence::from_days(row.duration) else {
        mealdrop_shared::bail!("order {} has unsupported duration {}", row.id, row.duration);
    };
    let Ok(status) = OrderStatus::from_str(&row.status) else {
        mealdrop_shared::bail!("order {} has unknown status {}", row.id, row.status);
    };
    let end_date = match row.end_date {
        Some(value) => Some(parse_iso(&value)?),
        None => None,
    };

    Ok(Order {
        start_date: parse_iso(&row.start_date)?,
        cadence,
        days_count: row.days_count as u32,
        end_date,
        credit_days: row.credit_days as u32,
        status,
        id: row.id,
        client_id: row.client_id,
        client_name: row.client_name,
    })
}

fn cancellation_from_row(row: CancellationRow) -> mealdrop_shared::Result<CancellationRecord> {
    Ok(CancellationRecord {
        date: parse_iso(&row.date)?,
        client_id: row.client_id,
        order_id: row.order_id,
        credit_applied: row.credit_applied,
        cancelled_at: row.cancelled_at,
    })
}

fn order_columns() -> [ClientOrder; 9] {
    [
        ClientOrder::Id,
        ClientOrder::ClientId,
        ClientOrder::ClientName,
        ClientOrder::StartDate,
        ClientOrder::Duration,
        ClientOrder::DaysCount,
        ClientOrder::EndDate,
        ClientOrder::CreditDays,
        ClientOrder::Status,
    ]
}

#[derive(Clone)]
pub struct Query {
    pub read_db: SqlitePool,
}

impl Query {
    pub fn new(read_db: SqlitePool) -> Self {
        Self { read_db }
    }

    /// Latest order still in a cancellable status for the client.
    pub async fn active_order(
        &self,
        client_id: impl Into<String>,
    ) -> mealdrop_shared::Result<Option<Order>> {
        let client_id = client_id.into();
        let statement = sea_query::Query::select()
            .columns(order_columns())
            .from(ClientOrder::Table)
            .and_where(Expr::col(ClientOrder::ClientId).eq(client_id))
            .and_where(Expr::col(ClientOrder::Status).is_in([
                OrderStatus::Pending.to_string(),
                OrderStatus::Approved.to_string(),
            ]))
            .order_by(ClientOrder::CreatedAt, sea_query::Order::Desc)
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, OrderRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        row.map(order_from_row).transpose()
    }

    pub async fn approved_orders(&self) -> mealdrop_shared::Result<Vec<Order>> {
        let statement = sea_query::Query::select()
            .columns(order_columns())
            .from(ClientOrder::Table)
            .and_where(Expr::col(ClientOrder::Status).eq(OrderStatus::Approved.to_string()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, OrderRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        rows.into_iter().map(order_from_row).collect()
    }

    pub async fn cancellation(
        &self,
        client_id: impl Into<String>,
        date: Date,
    ) -> mealdrop_shared::Result<Option<CancellationRecord>> {
        let client_id = client_id.into();
        let statement = sea_query::Query::select()
            .columns([
                Cancellation::ClientId,
                Cancellation::OrderId,
                Cancellation::Date,
                Cancellation::CreditApplied,
                Cancellation::CancelledAt,
            ])
            .from(Cancellation::Table)
            .and_where(Expr::col(Cancellation::ClientId).eq(client_id))
            .and_where(Expr::col(Cancellation::Date).eq(format_iso(date)))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, CancellationRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        row.map(cancellation_from_row).transpose()
    }

    /// All skipped days of a client, oldest first.
    pub async fn cancellations(
        &self,
        client_id: impl Into<String>,
    ) -> mealdrop_shared::Result<Vec<CancellationRecord>> {
        let client_id = client_id.into();
        let statement = sea_query::Query::select()
            .columns([
                Cancellation::ClientId,
                Cancellation::OrderId,
                Cancellation::Date,
                Cancellation::CreditApplied,
                Cancellation::CancelledAt,
            ])
            .from(Cancellation::Table)
            .and_where(Expr::col(Cancellation::ClientId).eq(client_id))
            .order_by(Cancellation::Date, sea_query::Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, CancellationRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        rows.into_iter().map(cancellation_from_row).collect()
    }

    /// Which of the given dates already carry a cancellation record for
    /// the client. Keys are looked up in chunks of [`KEY_CHUNK`].
    pub async fn cancelled_among(
        &self,
        client_id: impl Into<String>,
        dates: &[Date],
    ) -> mealdrop_shared::Result<Vec<Date>> {
        let client_id = client_id.into();
        let mut found = Vec::new();

        for chunk in dates.chunks(KEY_CHUNK) {
            let keys = chunk.iter().map(|date| format_iso(*date)).collect::<Vec<_>>();
            let statement = sea_query::Query::select()
                .columns([Cancellation::Date])
                .from(Cancellation::Table)
                .and_where(Expr::col(Cancellation::ClientId).eq(&client_id))
                .and_where(Expr::col(Cancellation::Date).is_in(keys))
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

            let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
                .fetch_all(&self.read_db)
                .await?;

            for (value,) in rows {
                found.push(parse_iso(&value)?);
            }
        }

        found.sort_unstable();

        Ok(found)
    }

    pub async fn cancelled_keys_in(
        &self,
        range: DateRange,
    ) -> mealdrop_shared::Result<HashSet<(String, Date)>> {
        let statement = sea_query::Query::select()
            .columns([Cancellation::ClientId, Cancellation::Date])
            .from(Cancellation::Table)
            .and_where(Expr::col(Cancellation::Date).gte(format_iso(range.from)))
            .and_where(Expr::col(Cancellation::Date).lte(format_iso(range.to)))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, (String, String), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut keys = HashSet::with_capacity(rows.len());
        for (client_id, value) in rows {
            keys.insert((client_id, parse_iso(&value)?));
        }

        Ok(keys)
    }

    pub async fn selection_keys_in(
        &self,
        range: DateRange,
    ) -> mealdrop_shared::Result<HashSet<(String, Date)>> {
        let statement = sea_query::Query::select()
            .columns([MealSelection::ClientId, MealSelection::Date])
            .from(MealSelection::Table)
            .and_where(Expr::col(MealSelection::Date).gte(format_iso(range.from)))
            .and_where(Expr::col(MealSelection::Date).lte(format_iso(range.to)))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, (String, String), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut keys = HashSet::with_capacity(rows.len());
        for (client_id, value) in rows {
            keys.insert((client_id, parse_iso(&value)?));
        }

        Ok(keys)
    }

    pub async fn has_selection(
        &self,
        client_id: impl Into<String>,
        date: Date,
    ) -> mealdrop_shared::Result<bool> {
        let client_id = client_id.into();
        let statement = sea_query::Query::select()
            .columns([MealSelection::ClientId])
            .from(MealSelection::Table)
            .and_where(Expr::col(MealSelection::ClientId).eq(client_id))
            .and_where(Expr::col(MealSelection::Date).eq(format_iso(date)))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.is_some())
    }
}
