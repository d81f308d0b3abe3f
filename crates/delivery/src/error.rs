use thiserror::Error;
use time::Date;

use crate::Cadence;

/// Rejection kinds a caller must distinguish. Every validation failure is
/// raised before any write; none are retried automatically.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid date: {0}")]
    InvalidDateFormat(String),

    #[error("{date} is not a delivery day on the {cadence} plan")]
    InvalidDeliveryDay { date: Date, cadence: Cadence },

    #[error("{date} is outside the modification window {first}..{last}")]
    OutsideModificationWindow { date: Date, first: Date, last: Date },

    #[error("already cancelled: {}", join_dates(.0))]
    AlreadyCancelled(Vec<Date>),

    #[error("no cancellation recorded for {0}")]
    NotCancelled(Date),

    #[error("client {0} has no active order")]
    NoActiveOrder(String),

    #[error("{requested} dates requested, the {cadence} plan allows at most {max} per call")]
    BatchSizeExceeded {
        requested: usize,
        max: usize,
        cadence: Cadence,
    },

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] mealdrop_shared::Error),
}

fn join_dates(dates: &[Date]) -> String {
    dates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
