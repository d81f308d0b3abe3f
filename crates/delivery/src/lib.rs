mod assign;
mod calendar;
mod cutoff;
mod error;
mod ledger;
mod query;
mod schedule;
mod types;

pub use assign::*;
pub use calendar::*;
pub use cutoff::*;
pub use error::*;
pub use ledger::*;
pub use query::*;
pub use schedule::*;
pub use types::*;
