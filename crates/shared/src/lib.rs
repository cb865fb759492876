mod date;
mod error;
pub mod input;
mod money;
mod status;

pub use date::*;
pub use error::*;
pub use money::*;
pub use status::*;
