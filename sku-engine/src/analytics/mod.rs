//! SKU 分析事件
//!
//! 咨询性遥测（advisory），不参与正确性保证：
//! - 事件通过 mpsc 通道异步发送到后台 worker
//! - 通道满时丢弃事件（分配路径绝不因遥测阻塞）
//! - worker 记录 debug 日志并累加原子计数器

mod service;
mod types;
mod worker;

pub use service::SkuAnalytics;
pub use types::{AnalyticsSnapshot, SkuEvent, SkuEventKind};
