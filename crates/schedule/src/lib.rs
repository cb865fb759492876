pub mod board;
mod command;
mod query;

pub use command::*;
pub use query::*;
