use std::collections::HashSet;

use sea_query::{OnConflict, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use time::Date;

use mealdrop_db::table::MealSelection;
use mealdrop_shared::date::{DateRange, format_iso};

use crate::{Order, OrderStatus, PendingSelection, Query, is_delivery_day, resolve_end_date};

/// For every day in the range, the approved orders that are deliverable,
/// not skipped, and still missing a meal selection. Entries are grouped by
/// date and sorted by client display name within each date.
pub fn pending_selections(
    range: DateRange,
    orders: &[Order],
    cancellations: &HashSet<(String, Date)>,
    selections: &HashSet<(String, Date)>,
) -> Vec<PendingSelection> {
    let mut approved = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Approved)
        .collect::<Vec<_>>();
    approved.sort_by(|a, b| a.client_name.cmp(&b.client_name));

    let resolved = approved
        .iter()
        .map(|order| resolve_end_date(order))
        .collect::<Vec<_>>();

    let mut pending = Vec::new();

    for date in range.days() {
        for (order, &end_date) in approved.iter().zip(&resolved) {
            if date < order.start_date || date > end_date {
                continue;
            }
            if !is_delivery_day(date, order.cadence) {
                continue;
            }

            let key = (order.client_id.clone(), date);
            if cancellations.contains(&key) || selections.contains(&key) {
                continue;
            }

            pending.push(PendingSelection {
                client_id: order.client_id.clone(),
                client_name: order.client_name.clone(),
                order_id: order.id.clone(),
                date,
            });
        }
    }

    pending
}

/// Read-mostly consumer of the ledger: builds the "needs selection" work
/// list for reporting, and fills it with a default meal on demand.
#[derive(Clone)]
pub struct Assigner {
    db: SqlitePool,
}

impl Assigner {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    fn query(&self) -> Query {
        Query::new(self.db.clone())
    }

    pub async fn pending(&self, range: DateRange) -> mealdrop_shared::Result<Vec<PendingSelection>> {
        let orders = self.query().approved_orders().await?;
        let cancellations = self.query().cancelled_keys_in(range).await?;
        let selections = self.query().selection_keys_in(range).await?;

        Ok(pending_selections(
            range,
            &orders,
            &cancellations,
            &selections,
        ))
    }

    /// Writes the default meal for every pending entry. Each insert
    /// re-checks record absence at write time, so a client picking their
    /// own meal concurrently wins.
    pub async fn auto_fill(
        &self,
        range: DateRange,
        meal: &str,
    ) -> mealdrop_shared::Result<u64> {
        let pending = self.pending(range).await?;
        let mut written = 0;

        for entry in &pending {
            let statement = sea_query::Query::insert()
                .into_table(MealSelection::Table)
                .columns([
                    MealSelection::ClientId,
                    MealSelection::OrderId,
                    MealSelection::Date,
                    MealSelection::Meal,
                ])
                .values_panic([
                    entry.client_id.clone().into(),
                    entry.order_id.clone().into(),
                    format_iso(entry.date).into(),
                    meal.to_owned().into(),
                ])
                .on_conflict(
                    OnConflict::columns([MealSelection::ClientId, MealSelection::Date])
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

            let result = sqlx::query_with(&sql, values).execute(&self.db).await?;
            written += result.rows_affected();
        }

        tracing::info!(
            from = %range.from,
            to = %range.to,
            pending = pending.len(),
            written,
            "auto-filled meal selections"
        );

        Ok(written)
    }
}
