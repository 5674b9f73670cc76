//! 分析事件后台 Worker
//!
//! 从 mpsc 通道消费事件，记录日志并累加计数器。
//! 通道关闭时自动退出。

use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::service::Counters;
use super::types::{SkuEvent, SkuEventKind};

/// 分析事件后台 Worker
pub(super) struct AnalyticsWorker {
    counters: Arc<Counters>,
}

impl AnalyticsWorker {
    pub fn new(counters: Arc<Counters>) -> Self {
        Self { counters }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<SkuEvent>) {
        tracing::debug!("SKU analytics worker started");

        while let Some(event) = rx.recv().await {
            let counter = match event.kind {
                SkuEventKind::Generated => &self.counters.generated,
                SkuEventKind::Validated => &self.counters.validated,
                SkuEventKind::Collision => &self.counters.collisions,
                SkuEventKind::DegradedFallback => &self.counters.degraded_fallbacks,
                SkuEventKind::Reserved => &self.counters.reserved,
                SkuEventKind::Released => &self.counters.released,
            };
            counter.fetch_add(1, Ordering::Relaxed);

            tracing::debug!(
                event = %serde_json::to_string(&event).unwrap_or_default(),
                "SKU analytics event"
            );
        }

        tracing::debug!("Analytics channel closed, worker stopping");
    }
}
