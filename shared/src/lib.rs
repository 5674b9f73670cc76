//! Shared types for the SKU engine
//!
//! Common types used across multiple crates: catalog models, SKU
//! component/request/response structures, and utility functions.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Model re-exports (for convenient access)
pub use models::{
    Brand, BulkGenerateRequest, BulkGenerateResult, Category, GenerateRequest, GeneratedSku,
    SkuComponents,
};
