//! 序列号分配器
//!
//! 主路径：共享缓存原子自增，首次自增时从目录库回填（backfill）。
//! 降级路径：缓存不可用时直接扫描目录库取 max+1 — 不是分布式安全的
//! 计数器，竞争窗口由唯一性校验器的重试循环兜底。
//!
//! 不变量：计数器一旦初始化，永远不低于该前缀下已提交的最大序列号
//! （回填总是以目录库扫描结果为种子，从不凭空归零）。

use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{SkuAnalytics, SkuEvent, SkuEventKind};
use crate::cache::{CacheError, SharedCache};
use crate::catalog::CatalogStore;
use crate::core::{SkuConfig, SkuResult};

/// 计数器键前缀（完整键形如 `sku:counter:NIKE:SHO`）
const COUNTER_KEY_PREFIX: &str = "sku:counter:";

/// 序列号分配器
#[derive(Clone)]
pub struct SequenceAllocator {
    cache: Arc<dyn SharedCache>,
    catalog: Arc<dyn CatalogStore>,
    analytics: SkuAnalytics,
    counter_ttl: Duration,
    pad: usize,
}

impl SequenceAllocator {
    pub fn new(
        cache: Arc<dyn SharedCache>,
        catalog: Arc<dyn CatalogStore>,
        analytics: SkuAnalytics,
        config: &SkuConfig,
    ) -> Self {
        Self {
            cache,
            catalog,
            analytics,
            counter_ttl: Duration::from_secs(config.counter_ttl_secs),
            pad: config.sequence_pad,
        }
    }

    /// 产生下一个未使用的序列号（零填充十进制字符串）
    pub async fn next(&self, brand_code: &str, category_code: &str) -> SkuResult<String> {
        let key = format!("{COUNTER_KEY_PREFIX}{brand_code}:{category_code}");
        let prefix = format!("{brand_code}-{category_code}-");

        let n = match self.cache.increment(&key).await {
            Ok(1) => {
                // 计数器首次自增：从目录库回填已提交的最大序列号
                match self.backfill(&key, &prefix).await? {
                    Some(n) => n,
                    None => self.degraded(&prefix).await?,
                }
            }
            Ok(n) if n > 0 => n as u64,
            Ok(n) => {
                tracing::warn!(key = %key, value = n, "Counter returned non-positive value, degrading");
                self.degraded(&prefix).await?
            }
            Err(e) => {
                self.warn_unavailable(&prefix, &e);
                self.degraded(&prefix).await?
            }
        };

        Ok(self.format_sequence(n))
    }

    /// 回填：扫描目录库，把计数器推进到 max+1 并刷新 TTL
    ///
    /// 返回 `None` 表示回填途中缓存失联（调用方转降级路径）。
    /// 另一个进程并发推进计数器时采用 last-writer-wins，
    /// 后续唯一性校验会兜底。
    async fn backfill(&self, key: &str, prefix: &str) -> SkuResult<Option<u64>> {
        let max = self.catalog.find_max_sequence(prefix).await?;

        let result: Result<u64, CacheError> = async {
            let n = if let Some(max) = max {
                self.cache.set(key, &(max + 1).to_string()).await?;
                // Re-fetch: a concurrent writer may have advanced past us
                self.cache
                    .get(key)
                    .await?
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(max + 1)
            } else {
                1
            };
            self.cache.expire(key, self.counter_ttl).await?;
            Ok(n)
        }
        .await;

        match result {
            Ok(n) => {
                tracing::debug!(prefix = %prefix, seeded_to = n, "Sequence counter backfilled");
                Ok(Some(n))
            }
            Err(e) => {
                self.warn_unavailable(prefix, &e);
                Ok(None)
            }
        }
    }

    /// 降级路径：直接扫描目录库（无缓存协调，接受竞争风险）
    async fn degraded(&self, prefix: &str) -> SkuResult<u64> {
        self.analytics
            .record(SkuEvent::new(SkuEventKind::DegradedFallback, prefix).tag("path", "sequence"));
        let max = self.catalog.find_max_sequence(prefix).await?.unwrap_or(0);
        Ok(max + 1)
    }

    fn warn_unavailable(&self, prefix: &str, error: &CacheError) {
        // 降级必须可观测：运维靠这条日志监控降级频率
        tracing::warn!(
            prefix = %prefix,
            error = %error,
            "Shared cache unavailable, sequence allocation degraded to catalog scan"
        );
    }

    fn format_sequence(&self, n: u64) -> String {
        format!("{:0width$}", n, width = self.pad)
    }
}
