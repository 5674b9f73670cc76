//! SKU 预留（短时互斥锁）
//!
//! 在"决定使用 SKU X"与"产品以 SKU X 提交入库"之间，
//! 阻止其他并发工作流认领 X。

mod manager;

pub use manager::{ReservationManager, ReserveOutcome};
