//! Catalog and SKU models

pub mod brand;
pub mod category;
pub mod sku;

// Re-exports
pub use brand::Brand;
pub use category::Category;
pub use sku::{
    BulkGenerateRequest, BulkGenerateResult, GenerateRequest, GeneratedSku, SkuComponents,
};
