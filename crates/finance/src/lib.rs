mod aggregate;
mod command;
mod dashboard;
mod query;

pub use aggregate::*;
pub use command::*;
pub use dashboard::*;
pub use query::*;
