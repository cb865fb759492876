use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle of a service instance. Parsing is case-insensitive.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[strum(ascii_case_insensitive)]
pub enum Status {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "cancelled")]
    Cancelled,
}

impl Status {
    /// Whether the visit still occupies its day (anything but cancelled).
    pub fn is_active(&self) -> bool {
        !matches!(self, Status::Cancelled)
    }
}
