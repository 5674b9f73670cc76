//! 分析事件类型定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 事件类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkuEventKind {
    /// SKU 生成成功
    Generated,
    /// 校验调用（parse 路径）
    Validated,
    /// 唯一性冲突后重试
    Collision,
    /// 缓存不可用，走降级分配路径
    DegradedFallback,
    /// 预留获取成功
    Reserved,
    /// 预留释放
    Released,
}

/// 结构化分析事件
///
/// 显式字段替代动态 metadata map，保留类型安全。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuEvent {
    pub id: Uuid,
    pub kind: SkuEventKind,
    /// 相关 SKU（校验失败等场景下为原始输入）
    pub sku: String,
    /// Unix 毫秒
    pub timestamp: i64,
    /// 附加标签（如 holder、attempt 序号）
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl SkuEvent {
    pub fn new(kind: SkuEventKind, sku: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            sku: sku.into(),
            timestamp: shared::util::now_millis(),
            tags: HashMap::new(),
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// 计数器快照
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AnalyticsSnapshot {
    pub generated: u64,
    pub validated: u64,
    pub collisions: u64,
    pub degraded_fallbacks: u64,
    pub reserved: u64,
    pub released: u64,
    /// 通道满被丢弃的事件数
    pub dropped: u64,
}
