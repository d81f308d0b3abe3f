use time::Date;

use crate::Cadence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Completed,
    Canceled,
}

/// Projection of an order as the ledger reads and writes it. Owned by the
/// billing subsystem; only `end_date` and `credit_days` are mutated here.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub start_date: Date,
    pub cadence: Cadence,
    pub days_count: u32,
    /// Absent on legacy orders. Resolve through
    /// [`resolve_end_date`](crate::resolve_end_date), never read directly.
    pub end_date: Option<Date>,
    pub credit_days: u32,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Approved)
    }
}

/// One skipped delivery day. Existence of the record is the single source
/// of truth for "no delivery on this date".
#[derive(Debug, Clone)]
pub struct CancellationRecord {
    pub client_id: String,
    pub order_id: String,
    pub date: Date,
    pub credit_applied: bool,
    pub cancelled_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub client_id: String,
    pub client_name: String,
    pub order_id: String,
    pub date: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled {
    pub end_date: Date,
    pub credit_days_added: u32,
}
