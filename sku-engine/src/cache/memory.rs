//! Memory 缓存实现 (进程内)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{CacheError, CacheResult, SharedCache};

/// In-process shared cache for single-node deployments and tests
///
/// Per-key atomicity comes from dashmap's entry locking: an entry guard
/// holds the shard lock for the whole read-modify-write.
/// 过期键惰性清理：读到已过期的键时当场移除。
#[derive(Debug, Default)]
pub struct MemoryCache {
    map: DashMap<String, CacheEntry>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    fn with_ttl(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// 当前存活键数量（测试用）
    pub fn len(&self) -> usize {
        self.map
            .iter()
            .filter(|entry| !entry.value().is_expired())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SharedCache for MemoryCache {
    async fn increment(&self, key: &str) -> CacheResult<i64> {
        let mut entry = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new("0"));
        if entry.is_expired() {
            // 过期键视为不存在：从 0 重新计数，TTL 清除
            *entry = CacheEntry::new("0");
        }
        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| CacheError::Backend(format!("value at '{key}' is not an integer")))?;
        let next = current + 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<bool> {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(CacheEntry::with_ttl(value, ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::with_ttl(value, ttl));
                Ok(true)
            }
        }
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(entry) = self.map.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        } else {
            return Ok(None);
        }
        // 已过期：惰性清理
        self.map.remove_if(key, |_, entry| entry.is_expired());
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.insert(CacheEntry::new(value));
                } else {
                    // 保留未过期条目的 TTL
                    occupied.get_mut().value = value.to_string();
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(value));
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.map.remove(key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        match self.map.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    occupied.remove();
                    Ok(false)
                } else {
                    occupied.get_mut().expires_at = Some(Instant::now() + ttl);
                    Ok(true)
                }
            }
            Entry::Vacant(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_increment_from_zero() {
        let cache = MemoryCache::new();
        assert_eq!(cache.increment("c").await.unwrap(), 1);
        assert_eq!(cache.increment("c").await.unwrap(), 2);
        assert_eq!(cache.increment("c").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_increment_non_integer_fails() {
        let cache = MemoryCache::new();
        cache.set("k", "hello").await.unwrap();
        assert!(cache.increment("k").await.is_err());
    }

    #[tokio::test]
    async fn test_set_if_absent_excludes() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);

        assert!(cache.set_if_absent("lock", "a", ttl).await.unwrap());
        // Second writer loses
        assert!(!cache.set_if_absent("lock", "b", ttl).await.unwrap());
        assert_eq!(cache.get("lock").await.unwrap(), Some("a".to_string()));

        // After delete, the key is claimable again
        cache.delete("lock").await.unwrap();
        assert!(cache.set_if_absent("lock", "b", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new();
        assert!(
            cache
                .set_if_absent("lock", "a", Duration::from_millis(20))
                .await
                .unwrap()
        );

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("lock").await.unwrap(), None);
        // Expired entry behaves as absent for conditional set
        assert!(
            cache
                .set_if_absent("lock", "b", Duration::from_secs(60))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_expired_counter_restarts() {
        let cache = MemoryCache::new();
        assert_eq!(cache.increment("c").await.unwrap(), 1);
        assert!(cache.expire("c", Duration::from_millis(20)).await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.increment("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expire_on_missing_key() {
        let cache = MemoryCache::new();
        assert!(!cache.expire("nope", Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_increment_no_duplicates() {
        use std::sync::Arc;

        let cache = Arc::new(MemoryCache::new());
        let mut handles = vec![];
        for _ in 0..10 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let mut values = vec![];
                for _ in 0..100 {
                    values.push(cache.increment("c").await.unwrap());
                }
                values
            }));
        }

        let mut all: Vec<i64> = vec![];
        for h in handles {
            all.extend(h.await.unwrap());
        }
        all.sort();
        let len_before = all.len();
        all.dedup();
        assert_eq!(all.len(), len_before, "Found duplicate counter values");
        assert_eq!(all.len(), 1000);
    }
}
