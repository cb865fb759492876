mod instance;
mod template;

pub use instance::*;
pub use template::*;

#[derive(Clone)]
pub struct Query(pub sqlx::SqlitePool);
