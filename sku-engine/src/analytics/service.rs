//! 分析事件服务

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use super::types::{AnalyticsSnapshot, SkuEvent, SkuEventKind};
use super::worker::AnalyticsWorker;

/// 共享计数器（worker 写，快照读）
#[derive(Debug, Default)]
pub(super) struct Counters {
    pub generated: AtomicU64,
    pub validated: AtomicU64,
    pub collisions: AtomicU64,
    pub degraded_fallbacks: AtomicU64,
    pub reserved: AtomicU64,
    pub released: AtomicU64,
    pub dropped: AtomicU64,
}

/// 分析事件服务
///
/// 通过 mpsc 通道把事件交给后台 worker。与审计日志不同，
/// 分析数据是咨询性的：通道满时 `try_send` 丢弃事件并计数，
/// 绝不阻塞分配路径。
#[derive(Debug, Clone)]
pub struct SkuAnalytics {
    tx: mpsc::Sender<SkuEvent>,
    counters: Arc<Counters>,
}

impl SkuAnalytics {
    /// 创建服务并启动后台 worker
    pub fn spawn(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let counters = Arc::new(Counters::default());
        let worker = AnalyticsWorker::new(Arc::clone(&counters));
        tokio::spawn(worker.run(rx));
        Self { tx, counters }
    }

    /// 记录事件（非阻塞，通道满时丢弃）
    pub fn record(&self, event: SkuEvent) {
        if let Err(e) = self.tx.try_send(event) {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Analytics event dropped: {}", e);
        }
    }

    /// 便捷记录：只有事件类型和 SKU
    pub fn record_kind(&self, kind: SkuEventKind, sku: &str) {
        self.record(SkuEvent::new(kind, sku));
    }

    /// 读取计数器快照
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot {
            generated: self.counters.generated.load(Ordering::Relaxed),
            validated: self.counters.validated.load(Ordering::Relaxed),
            collisions: self.counters.collisions.load(Ordering::Relaxed),
            degraded_fallbacks: self.counters.degraded_fallbacks.load(Ordering::Relaxed),
            reserved: self.counters.reserved.load(Ordering::Relaxed),
            released: self.counters.released.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_reach_counters() {
        let analytics = SkuAnalytics::spawn(16);
        analytics.record_kind(SkuEventKind::Generated, "NIKE-SHO-L-BLK-001");
        analytics.record_kind(SkuEventKind::Generated, "NIKE-SHO-L-BLK-002");
        analytics.record_kind(SkuEventKind::Validated, "NIKE-SHO-L-BLK-001");

        // Worker is async; give it a moment to drain
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let snap = analytics.snapshot();
        assert_eq!(snap.generated, 2);
        assert_eq!(snap.validated, 1);
        assert_eq!(snap.collisions, 0);
    }

    #[tokio::test]
    async fn test_tagged_event() {
        let analytics = SkuAnalytics::spawn(16);
        analytics.record(
            SkuEvent::new(SkuEventKind::Reserved, "PUMA-ACC-OS-NON-001").tag("holder", "wf-42"),
        );

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(analytics.snapshot().reserved, 1);
    }
}
