mod command;
pub mod date;

pub use command::*;
