//! SKU component and request/response types

use serde::{Deserialize, Serialize};

/// The five typed fields of a SKU string (`BRAND-CATEGORY-SIZE-COLOR-SEQUENCE`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuComponents {
    pub brand: String,
    pub category: String,
    pub size: String,
    pub color: String,
    /// Zero-padded decimal string; may itself contain hyphens when parsed
    /// from a SKU with a custom suffix
    pub sequence: String,
}

impl SkuComponents {
    /// (brand, category) prefix used for counter keys and catalog scans
    pub fn prefix(&self) -> String {
        format!("{}-{}-", self.brand, self.category)
    }
}

/// Generate request payload
///
/// `brand`/`category` are human-entered references (short code, exact
/// name, or numeric id) resolved through the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub brand: String,
    pub category: String,
    pub size: Option<String>,
    pub color: Option<String>,
    /// Bypasses the sequence allocator (still uniqueness-checked)
    pub custom_suffix: Option<String>,
    /// When present, the final SKU is reserved for this identity
    pub holder_id: Option<String>,
}

impl GenerateRequest {
    pub fn new(brand: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            category: category.into(),
            size: None,
            color: None,
            custom_suffix: None,
            holder_id: None,
        }
    }

    pub fn with_variant(mut self, size: Option<&str>, color: Option<&str>) -> Self {
        self.size = size.map(String::from);
        self.color = color.map(String::from);
        self
    }

    pub fn with_holder(mut self, holder_id: impl Into<String>) -> Self {
        self.holder_id = Some(holder_id.into());
        self
    }
}

/// Generate response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSku {
    pub sku: String,
    pub components: SkuComponents,
    /// True when a reservation was acquired for the requested holder
    pub reserved: bool,
}

/// One item of a bulk generate request (no reservation in bulk mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkGenerateRequest {
    pub brand: String,
    pub category: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Per-item bulk result — bulk processing never fails as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkGenerateResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkGenerateResult {
    pub fn ok(sku: impl Into<String>) -> Self {
        Self {
            success: true,
            sku: Some(sku.into()),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sku: None,
            error: Some(error.into()),
        }
    }
}
