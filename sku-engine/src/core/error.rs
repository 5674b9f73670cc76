//! 统一错误处理
//!
//! 提供引擎级错误类型：
//! - [`SkuError`] - 错误枚举（调用方错误 / 配置错误 / 基础设施错误）
//! - [`SkuResult`] - Result 类型别名
//!
//! # 错误分类
//!
//! | 分类 | 变体 | 说明 |
//! |------|------|------|
//! | 调用方错误 | InvalidComponent | 字段非法，不重试 |
//! | 引用错误 | ReferenceNotFound | 品牌/分类无法解析（404 语义） |
//! | 配置错误 | MissingCode | 品牌/分类存在但缺少短代码 |
//! | 致命错误 | SkuExhausted | 重试预算耗尽，分配器系统性分歧 |
//! | 冲突 | ReservationConflict | 预留已被持有，应换候选而非等待 |
//! | 基础设施 | Cache / Catalog / Database | 底层存储错误 |

use crate::cache::CacheError;
use crate::catalog::CatalogError;
use thiserror::Error;

/// 引擎错误枚举
#[derive(Debug, Error)]
pub enum SkuError {
    // ========== 调用方错误 ==========
    #[error("Invalid SKU component '{field}': {reason}")]
    /// 格式器输入非法（调用方 bug，不重试）
    InvalidComponent { field: &'static str, reason: String },

    #[error("Reference not found: {0}")]
    /// 品牌或分类引用无法解析
    ReferenceNotFound(String),

    #[error("Missing SKU code for {0}")]
    /// 品牌/分类存在但缺少短代码（目录数据配置错误）
    MissingCode(String),

    // ========== 分配错误 ==========
    #[error("SKU space exhausted after {attempts} attempts for candidate {candidate}")]
    /// 唯一性校验重试预算耗尽（当前请求致命，稍后整体重试安全）
    SkuExhausted { candidate: String, attempts: u32 },

    #[error("SKU already reserved: {0}")]
    /// 预留冲突（调用方应请求新候选）
    ReservationConflict(String),

    // ========== 基础设施错误 ==========
    #[error("Cache error: {0}")]
    /// 共享缓存错误（分配路径上会被降级吸收，预留路径上向上传播）
    Cache(#[from] CacheError),

    #[error("Catalog error: {0}")]
    /// 目录库错误
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    /// 数据库连接/迁移错误
    Database(String),

    #[error("Internal error")]
    /// 内部错误
    Internal(#[from] anyhow::Error),
}

impl SkuError {
    // ========== Convenient constructors ==========

    /// Create an InvalidComponent error
    pub fn invalid_component(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidComponent {
            field,
            reason: reason.into(),
        }
    }

    /// Create a ReferenceNotFound error
    pub fn reference_not_found(reference: impl Into<String>) -> Self {
        Self::ReferenceNotFound(reference.into())
    }

    /// Create a MissingCode error
    pub fn missing_code(reference: impl Into<String>) -> Self {
        Self::MissingCode(reference.into())
    }

    /// Create a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// True when retrying the whole operation later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SkuExhausted { .. }
                | Self::ReservationConflict(_)
                | Self::Cache(_)
                | Self::Catalog(_)
                | Self::Database(_)
        )
    }
}

/// 引擎操作的 Result 类型别名
pub type SkuResult<T> = std::result::Result<T, SkuError>;
