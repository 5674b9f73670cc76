//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Mirrors [`super::Brand`]: the short `code` is what lands in the SKU
/// (e.g. "SHO" for shoes, "TSH" for t-shirts).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
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
