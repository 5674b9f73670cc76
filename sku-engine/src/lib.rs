//! SKU Engine - SKU 生成与预留引擎
//!
//! # 架构概述
//!
//! 本 crate 负责产生唯一的结构化产品标识符
//! (`BRAND-CATEGORY-SIZE-COLOR-SEQUENCE`)，并阻止并发的产品创建
//! 工作流认领同一标识符：
//!
//! - **格式化** (`format`): SKU 字符串构建/解析 + 尺码/颜色规范化（纯函数）
//! - **序列分配** (`sequence`): 共享缓存原子计数器 + 目录库回填 + 降级路径
//! - **唯一性校验** (`verify`): 有界重试 + 加密随机后缀
//! - **预留** (`reserve`): TTL 互斥锁（条件写入原语）
//! - **分析** (`analytics`): 咨询性结构化事件
//!
//! 目录库（已提交 SKU 的权威来源）对本引擎只读；提交由调用方完成。
//!
//! # 模块结构
//!
//! ```text
//! sku-engine/src/
//! ├── core/          # 配置、错误
//! ├── cache/         # 共享缓存抽象 + 进程内实现
//! ├── catalog/       # 目录库读取抽象 + SQLite 实现
//! ├── db.rs          # SQLite 连接池与迁移
//! ├── format/        # 格式化器、规范化器
//! ├── sequence/      # 序列号分配器
//! ├── verify/        # 唯一性校验器
//! ├── reserve/       # 预留管理器
//! ├── analytics/     # 分析事件
//! └── utils/         # 日志等工具
//! ```

pub mod analytics;
pub mod cache;
pub mod catalog;
pub mod core;
pub mod db;
pub mod format;
pub mod reserve;
pub mod sequence;
pub mod service;
pub mod utils;
pub mod verify;

// Re-export 公共类型
pub use analytics::{AnalyticsSnapshot, SkuAnalytics, SkuEvent, SkuEventKind};
pub use cache::{CacheError, MemoryCache, SharedCache};
pub use catalog::{CatalogError, CatalogStore, SqliteCatalog};
pub use core::{SkuConfig, SkuError, SkuResult};
pub use db::DbService;
pub use reserve::{ReservationManager, ReserveOutcome};
pub use sequence::SequenceAllocator;
pub use service::SkuService;
pub use verify::UniquenessVerifier;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
