//! Brand Model

use serde::{Deserialize, Serialize};

/// Brand entity
///
/// `code` is the short uppercase alphanumeric identifier embedded in SKUs
/// (e.g. "NIKE"). A brand without a code cannot participate in SKU
/// generation; that state is surfaced as a configuration error, not a 404.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    /// Short SKU code (2-6 uppercase alphanumeric chars)
    pub code: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
