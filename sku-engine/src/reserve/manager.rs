//! 预留管理器
//!
//! `ReservationManager` 基于共享缓存的条件写入原语
//! （set-if-not-exists-with-expiry）实现对单个 SKU 字符串的短时互斥：
//! - 预留值存储持有者身份，释放时要求匹配
//! - TTL 到期是唯一的死锁预防机制（无续约/心跳）
//! - 同一时刻每个 SKU 至多一个存活预留
//!
//! ## 持有者匹配
//!
//! `release` 只删除持有者匹配的预留；工作流 A 不能误释放工作流 B
//! 的锁。无条件删除通过 `force_release` 单独暴露（运维场景）。

use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{SkuAnalytics, SkuEvent, SkuEventKind};
use crate::cache::SharedCache;
use crate::core::{SkuConfig, SkuResult};
use serde::Serialize;

/// 预留键前缀（完整键形如 `sku:reserve:NIKE-SHO-L-BLK-001`）
const RESERVE_KEY_PREFIX: &str = "sku:reserve:";

/// 预留尝试的结果
#[derive(Debug, Clone, Serialize)]
pub struct ReserveOutcome {
    /// 是否成功获取（已有存活预留时为 false，状态不变）
    pub acquired: bool,
    /// 获取成功时的到期时间（Unix 毫秒）
    pub expires_at: Option<i64>,
}

/// 预留管理器
#[derive(Clone)]
pub struct ReservationManager {
    cache: Arc<dyn SharedCache>,
    analytics: SkuAnalytics,
    default_ttl: Duration,
}

impl ReservationManager {
    pub fn new(cache: Arc<dyn SharedCache>, analytics: SkuAnalytics, config: &SkuConfig) -> Self {
        Self {
            cache,
            analytics,
            default_ttl: Duration::from_secs(config.reservation_ttl_secs),
        }
    }

    fn key(sku: &str) -> String {
        format!("{RESERVE_KEY_PREFIX}{sku}")
    }

    /// 尝试获取预留（原子条件写入，已被持有时不改变任何状态）
    pub async fn reserve(
        &self,
        sku: &str,
        holder_id: &str,
        ttl_secs: Option<u64>,
    ) -> SkuResult<ReserveOutcome> {
        let ttl = ttl_secs.map_or(self.default_ttl, Duration::from_secs);
        let acquired = self
            .cache
            .set_if_absent(&Self::key(sku), holder_id, ttl)
            .await?;

        if acquired {
            self.analytics.record(
                SkuEvent::new(SkuEventKind::Reserved, sku).tag("holder", holder_id),
            );
            tracing::debug!(sku = %sku, holder = %holder_id, ttl_secs = ttl.as_secs(), "SKU reserved");
            Ok(ReserveOutcome {
                acquired: true,
                expires_at: Some(shared::util::now_millis() + ttl.as_millis() as i64),
            })
        } else {
            tracing::debug!(sku = %sku, holder = %holder_id, "Reservation conflict");
            Ok(ReserveOutcome {
                acquired: false,
                expires_at: None,
            })
        }
    }

    /// 释放预留（幂等）
    ///
    /// 返回 true 表示锁已不存在或已由本持有者释放；
    /// 返回 false 表示锁由其他持有者持有，未删除。
    pub async fn release(&self, sku: &str, holder_id: &str) -> SkuResult<bool> {
        match self.cache.get(&Self::key(sku)).await? {
            None => Ok(true),
            Some(holder) if holder == holder_id => {
                self.cache.delete(&Self::key(sku)).await?;
                self.analytics.record(
                    SkuEvent::new(SkuEventKind::Released, sku).tag("holder", holder_id),
                );
                tracing::debug!(sku = %sku, holder = %holder_id, "SKU released");
                Ok(true)
            }
            Some(holder) => {
                tracing::warn!(
                    sku = %sku,
                    requested_by = %holder_id,
                    held_by = %holder,
                    "Release refused: reservation held by another identity"
                );
                Ok(false)
            }
        }
    }

    /// 无条件释放（不校验持有者）
    pub async fn force_release(&self, sku: &str) -> SkuResult<()> {
        self.cache.delete(&Self::key(sku)).await?;
        self.analytics
            .record(SkuEvent::new(SkuEventKind::Released, sku).tag("forced", "true"));
        tracing::info!(sku = %sku, "SKU reservation force-released");
        Ok(())
    }

    /// 是否存在存活预留
    pub async fn is_reserved(&self, sku: &str) -> SkuResult<bool> {
        Ok(self.cache.get(&Self::key(sku)).await?.is_some())
    }

    /// 存活预留的持有者身份
    pub async fn holder_of(&self, sku: &str) -> SkuResult<Option<String>> {
        Ok(self.cache.get(&Self::key(sku)).await?)
    }
}
