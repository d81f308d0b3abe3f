use sea_query::{Expr, ExprTrait, OnConflict, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use time::Date;

use mealdrop_db::table::{Cancellation, ClientOrder};
use mealdrop_shared::date::{format_iso, parse_iso};

use crate::{
    Cancelled, LedgerError, ModificationWindow, Order, Query, extend_end_date, is_delivery_day,
    resolve_end_date, retract_end_date,
};

/// Write side of the credit-day ledger. A skipped delivery creates a
/// cancellation record, extends the order's end date by one delivery day
/// and increments its credit days; restoring undoes exactly one of each.
/// Record writes and the order update always land in one transaction, so
/// the end date and credit count can never be observed out of step.
#[derive(Clone)]
pub struct Ledger {
    db: SqlitePool,
}

impl Ledger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    fn query(&self) -> Query {
        Query::new(self.db.clone())
    }

    async fn active_order(
        &self,
        client_id: &str,
        order_id: &str,
    ) -> Result<Order, LedgerError> {
        let order = self.query().active_order(client_id).await?;

        match order {
            Some(order) if order.id == order_id => Ok(order),
            _ => Err(LedgerError::NoActiveOrder(client_id.to_owned())),
        }
    }

    fn check_modifiable(
        date: Date,
        order: &Order,
        window: &ModificationWindow,
        today: Date,
    ) -> Result<(), LedgerError> {
        if !is_delivery_day(date, order.cadence) {
            return Err(LedgerError::InvalidDeliveryDay {
                date,
                cadence: order.cadence,
            });
        }

        if date <= today || !window.contains(date) {
            return Err(LedgerError::OutsideModificationWindow {
                date,
                first: window.first,
                last: window.last,
            });
        }

        Ok(())
    }

    /// Skips the given delivery days, crediting one day per skip. The whole
    /// call is validated before anything is written and rejected wholesale
    /// on the first violation.
    pub async fn cancel(
        &self,
        client_id: &str,
        order_id: &str,
        dates: &[String],
        today: Date,
    ) -> Result<Cancelled, LedgerError> {
        let mut parsed = Vec::with_capacity(dates.len());
        for value in dates {
            let date =
                parse_iso(value).map_err(|_| LedgerError::InvalidDateFormat(value.clone()))?;
            parsed.push(date);
        }
        parsed.sort_unstable();

        // A date repeated within one call collides with itself.
        let mut collisions = parsed
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect::<Vec<_>>();

        let order = self.active_order(client_id, order_id).await?;

        if parsed.is_empty() {
            return Ok(Cancelled {
                end_date: resolve_end_date(&order),
                credit_days_added: 0,
            });
        }

        let max = order.cadence.max_batch_cancel();
        if parsed.len() > max {
            return Err(LedgerError::BatchSizeExceeded {
                requested: parsed.len(),
                max,
                cadence: order.cadence,
            });
        }

        let window = ModificationWindow::from_today(today);
        for &date in &parsed {
            Self::check_modifiable(date, &order, &window, today)?;
        }

        collisions.extend(self.query().cancelled_among(client_id, &parsed).await?);
        if !collisions.is_empty() {
            collisions.sort_unstable();
            collisions.dedup();
            return Err(LedgerError::AlreadyCancelled(collisions));
        }

        let added = parsed.len() as u32;
        let end_date = extend_end_date(resolve_end_date(&order), order.cadence, added);
        let credit_days = order.credit_days + added;

        let mut tx = self.db.begin().await?;

        for &date in &parsed {
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
                    order.id.clone().into(),
                    format_iso(date).into(),
                    true.into(),
                ])
                .on_conflict(
                    OnConflict::columns([Cancellation::ClientId, Cancellation::Date])
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

            // Conditional create: a concurrent duplicate shows up as zero
            // affected rows and aborts the whole batch.
            let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
            if result.rows_affected() == 0 {
                return Err(LedgerError::AlreadyCancelled(vec![date]));
            }
        }

        let statement = sea_query::Query::update()
            .table(ClientOrder::Table)
            .values([
                (ClientOrder::EndDate, format_iso(end_date).into()),
                (ClientOrder::CreditDays, (credit_days as i64).into()),
            ])
            .and_where(Expr::col(ClientOrder::Id).eq(&order.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(
            client_id,
            order_id = %order.id,
            cancelled = added,
            end_date = %end_date,
            "cancelled delivery days"
        );

        Ok(Cancelled {
            end_date,
            credit_days_added: added,
        })
    }

    /// Restores a single skipped delivery day. Only possible while the
    /// date is still inside the modification window; once production has
    /// committed, a skip is final.
    pub async fn restore(
        &self,
        client_id: &str,
        order_id: &str,
        date: &str,
        today: Date,
    ) -> Result<(), LedgerError> {
        let date = parse_iso(date).map_err(|_| LedgerError::InvalidDateFormat(date.to_owned()))?;

        let order = self.active_order(client_id, order_id).await?;

        let window = ModificationWindow::from_today(today);
        Self::check_modifiable(date, &order, &window, today)?;

        let Some(record) = self.query().cancellation(client_id, date).await? else {
            return Err(LedgerError::NotCancelled(date));
        };

        let mut tx = self.db.begin().await?;

        let statement = sea_query::Query::delete()
            .from_table(Cancellation::Table)
            .and_where(Expr::col(Cancellation::ClientId).eq(client_id))
            .and_where(Expr::col(Cancellation::Date).eq(format_iso(date)))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(LedgerError::NotCancelled(date));
        }

        if record.credit_applied {
            let end_date = retract_end_date(resolve_end_date(&order), order.cadence, 1);
            let credit_days = order.credit_days.saturating_sub(1);

            let statement = sea_query::Query::update()
                .table(ClientOrder::Table)
                .values([
                    (ClientOrder::EndDate, format_iso(end_date).into()),
                    (ClientOrder::CreditDays, (credit_days as i64).into()),
                ])
                .and_where(Expr::col(ClientOrder::Id).eq(&order.id))
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(
            client_id,
            order_id = %order.id,
            date = %date,
            credit_applied = record.credit_applied,
            "restored delivery day"
        );

        Ok(())
    }
}
