use sqlx::SqlitePool;

mod generate;
mod instance;
mod template;

pub use generate::*;
pub use instance::*;
pub use template::*;

#[derive(Clone)]
pub struct Command(pub SqlitePool);
