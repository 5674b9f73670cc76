//! Catalog Store Module
//!
//! Read-only view of the committed product catalog. The engine never
//! writes product rows — commit is the caller's responsibility, observed
//! here only through the read path.

mod sqlite;

pub use sqlite::SqliteCatalog;

use async_trait::async_trait;
use shared::models::{Brand, Category};
use thiserror::Error;

/// Catalog store error types
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-side contract against the committed catalog
///
/// 实现必须保证 `find_max_sequence` 按数值比较序列号，
/// 不能依赖字符串排序（"010" 与 "9" 的字典序与数值序相反）。
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Resolve a human-entered brand reference (code, exact name, or
    /// numeric id) to the brand record
    async fn find_brand(&self, reference: &str) -> CatalogResult<Option<Brand>>;

    /// Resolve a human-entered category reference to the category record
    async fn find_category(&self, reference: &str) -> CatalogResult<Option<Category>>;

    /// True when a committed product already carries this SKU
    async fn sku_exists(&self, sku: &str) -> CatalogResult<bool>;

    /// Highest committed sequence number among SKUs under `prefix`
    /// (e.g. "NIKE-SHO-"), compared numerically; None when no SKU matches
    async fn find_max_sequence(&self, prefix: &str) -> CatalogResult<Option<u64>>;
}
