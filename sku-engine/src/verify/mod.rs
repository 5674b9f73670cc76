//! 唯一性校验
//!
//! 候选 SKU 必须同时通过两道检查：
//! 1. 目录库中不存在已提交的同名 SKU
//! 2. 不存在其他身份持有的存活预留
//!
//! 任一检查失败时换用加密随机的 3 位后缀重试（与确定性序列路径
//! 区分，降低重复碰撞概率）。重试预算耗尽返回 `SkuExhausted` —
//! 这是当前请求的致命错误，意味着分配器出现系统性分歧。

use std::sync::Arc;

use rand::Rng;
use rand::rngs::OsRng;

use crate::analytics::{SkuAnalytics, SkuEvent, SkuEventKind};
use crate::catalog::CatalogStore;
use crate::core::{SkuConfig, SkuError, SkuResult};
use crate::format::formatter;
use crate::reserve::ReservationManager;

/// 唯一性校验器
#[derive(Clone)]
pub struct UniquenessVerifier {
    catalog: Arc<dyn CatalogStore>,
    reservations: ReservationManager,
    analytics: SkuAnalytics,
    max_attempts: u32,
}

impl UniquenessVerifier {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        reservations: ReservationManager,
        analytics: SkuAnalytics,
        config: &SkuConfig,
    ) -> Self {
        Self {
            catalog,
            reservations,
            analytics,
            max_attempts: config.max_attempts,
        }
    }

    /// 确认候选 SKU 可用，冲突时在重试预算内换随机后缀
    ///
    /// `holder_id` 持有的预留不算冲突（调用方即将提交自己预留的 SKU）。
    pub async fn ensure_unique(
        &self,
        candidate: &str,
        holder_id: Option<&str>,
    ) -> SkuResult<String> {
        let mut sku = candidate.to_string();

        for attempt in 1..=self.max_attempts {
            if self.is_available(&sku, holder_id).await? {
                if attempt > 1 {
                    tracing::debug!(
                        candidate = %candidate,
                        resolved = %sku,
                        attempt,
                        "Collision resolved with random suffix"
                    );
                }
                return Ok(sku);
            }

            self.analytics
                .record(SkuEvent::new(SkuEventKind::Collision, &sku).tag("attempt", attempt.to_string()));
            sku = resuffix(&sku)?;
        }

        tracing::error!(
            candidate = %candidate,
            attempts = self.max_attempts,
            "SKU uniqueness retry budget exhausted"
        );
        Err(SkuError::SkuExhausted {
            candidate: candidate.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn is_available(&self, sku: &str, holder_id: Option<&str>) -> SkuResult<bool> {
        if self.catalog.sku_exists(sku).await? {
            return Ok(false);
        }

        // 缓存失联时互斥保护已不可用，目录检查仍然有效 — 降级而非报错
        match self.reservations.holder_of(sku).await {
            Ok(None) => Ok(true),
            Ok(Some(holder)) => Ok(holder_id.is_some_and(|mine| mine == holder)),
            Err(SkuError::Cache(e)) => {
                tracing::warn!(sku = %sku, error = %e, "Reservation check skipped, cache unavailable");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}

/// 用加密随机的 3 位序列号重建候选
fn resuffix(sku: &str) -> SkuResult<String> {
    let c = formatter::parse(sku)
        .ok_or_else(|| SkuError::invalid_component("sku", format!("unparseable candidate '{sku}'")))?;
    let suffix: u32 = OsRng.gen_range(0..1000);
    formatter::build(&c.brand, &c.category, &c.size, &c.color, &format!("{suffix:03}"))
}
