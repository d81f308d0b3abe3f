#![allow(dead_code)]

use std::path::PathBuf;

use sea_query::{ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use time::Date;
use time::macros::date;

use mealdrop_db::table::{Cancellation, ClientOrder, MealSelection};
use mealdrop_delivery::{Cadence, OrderStatus};
use mealdrop_shared::date::format_iso;

pub async fn setup_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    mealdrop_db::migrate(&pool).await?;

    Ok(pool)
}

pub struct OrderFixture {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub start_date: Date,
    pub cadence: Cadence,
    pub days_count: u32,
    pub end_date: Option<Date>,
    pub credit_days: u32,
    pub status: OrderStatus,
}

impl OrderFixture {
    /// A 5-day order over January 2026: 20 deliveries from Monday the 5th,
    /// ending Friday the 30th.
    pub fn five_day(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            client_name: "Ada".to_owned(),
            start_date: date!(2026 - 01 - 05),
            cadence: Cadence::FiveDay,
            days_count: 20,
            end_date: Some(date!(2026 - 01 - 30)),
            credit_days: 0,
            status: OrderStatus::Approved,
        }
    }

    /// The 6-day sibling: 24 deliveries from the same start, ending
    /// Saturday the 31st.
    pub fn six_day(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            cadence: Cadence::SixDay,
            days_count: 24,
            end_date: Some(date!(2026 - 01 - 31)),
            ..Self::five_day(id, client_id)
        }
    }
}

pub async fn insert_order(pool: &SqlitePool, fixture: &OrderFixture) -> anyhow::Result<()> {
    let statement = sea_query::Query::insert()
        .into_table(ClientOrder::Table)
        .columns([
            ClientOrder::Id,
            ClientOrder::ClientId,
            ClientOrder::ClientName,
            ClientOrder::StartDate,
            ClientOrder::Duration,
            ClientOrder::DaysCount,
            ClientOrder::EndDate,
            ClientOrder::CreditDays,
            ClientOrder::Status,
        ])
        .values_panic([
            fixture.id.clone().into(),
            fixture.client_id.clone().into(),
            fixture.client_name.clone().into(),
            format_iso(fixture.start_date).into(),
            fixture.cadence.days_per_week().into(),
            (fixture.days_count as i64).into(),
            fixture.end_date.map(format_iso).into(),
            (fixture.credit_days as i64).into(),
            fixture.status.to_string().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn insert_cancellation(
    pool: &SqlitePool,
    client_id: &str,
    order_id: &str,
    date: Date,
    credit_applied: bool,
) -> anyhow::Result<()> {
    let statement = sea_query::Query::insert()
        .into_table(Cancellation::Table)
        .columns([
            Cancellation::ClientId,
            Cancellation::OrderId,
            Cancellation::Date,
            Cancellation::CreditApplied,
        ])
        .values_panic([
            client_id.to_owned().into(),
            order_id.to_owned().into(),
            format_iso(date).into(),
            credit_applied.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

pub async fn insert_selection(
    pool: &SqlitePool,
    client_id: &str,
    order_id: &str,
    date: Date,
    meal: &str,
) -> anyhow::Result<()> {
    let statement = sea_query::Query::insert()
        .into_table(MealSelection::Table)
        .columns([
            MealSelection::ClientId,
            MealSelection::OrderId,
            MealSelection::Date,
            MealSelection::Meal,
        ])
        .values_panic([
            client_id.to_owned().into(),
            order_id.to_owned().into(),
            format_iso(date).into(),
            meal.to_owned().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}

/// Stored (end_date, credit_days) of an order row.
pub async fn order_state(pool: &SqlitePool, id: &str) -> anyhow::Result<(Option<String>, i64)> {
    let statement = sea_query::Query::select()
        .columns([ClientOrder::EndDate, ClientOrder::CreditDays])
        .from(ClientOrder::Table)
        .and_where(sea_query::Expr::col(ClientOrder::Id).eq(id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let row = sqlx::query_as_with::<_, (Option<String>, i64), _>(&sql, values)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

pub async fn cancellation_dates(pool: &SqlitePool, client_id: &str) -> anyhow::Result<Vec<String>> {
    let statement = sea_query::Query::select()
        .columns([Cancellation::Date])
        .from(Cancellation::Table)
        .and_where(sea_query::Expr::col(Cancellation::ClientId).eq(client_id))
        .order_by(Cancellation::Date, sea_query::Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(date,)| date).collect())
}

pub async fn selection_count(pool: &SqlitePool) -> anyhow::Result<i64> {
    let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM meal_selection")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
