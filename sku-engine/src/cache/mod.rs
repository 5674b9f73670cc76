//! SharedCache 共享缓存抽象
//!
//! 提供可插拔的缓存后端架构：
//! ```text
//!         ┌────────────────────┐
//!         │  SharedCache Trait │  ◄── 可插拔接口
//!         └────────┬───────────┘
//!                  │
//!          ┌───────┴────────┐
//!          ▼                ▼
//!     MemoryCache      (任何支持条件写入 + TTL
//!     (进程内缓存)       的原子 KV 存储)
//! ```
//!
//! 计数器和预留键是引擎唯一的可变共享状态，全部通过单键原子原语
//! （increment / set_if_absent / delete）修改，不使用多键事务。

mod memory;

pub use memory::MemoryCache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 缓存层错误
///
/// 任何变体在分配路径上都触发降级回退（直接扫描目录库），
/// 在预留路径上原样向上传播。
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    /// 连接失败 / 超时 — 触发降级路径
    Unavailable(String),

    #[error("Cache backend error: {0}")]
    /// 后端拒绝操作（如对非整数值执行 increment）
    Backend(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// SharedCache 共享缓存特征
///
/// 所有缓存实现必须实现此特征。每个方法都是单键原子操作；
/// 跨键没有任何顺序保证（也不需要）。
#[async_trait]
pub trait SharedCache: Send + Sync + std::fmt::Debug {
    /// 原子自增，键不存在时从 0 开始（返回自增后的值）
    async fn increment(&self, key: &str) -> CacheResult<i64>;

    /// 条件写入：键不存在（或已过期）时写入并设置 TTL，返回是否写入成功
    ///
    /// 这是预留锁依赖的 compare-and-swap 原语。
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<bool>;

    /// 读取键值（不存在或已过期返回 None）
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// 无条件写入键值（保留已有 TTL 则由实现决定；本引擎总是随后调用 expire）
    async fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// 无条件删除（键不存在也成功，幂等）
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// 设置/刷新 TTL，返回键是否存在
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool>;
}
