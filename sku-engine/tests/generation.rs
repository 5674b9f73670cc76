//! 端到端生成测试 - SQLite 目录库 + 进程内缓存
//!
//! 覆盖完整生成流程：解析引用 → 序列分配 → 唯一性校验，
//! 以及缓存不可用时的降级路径。

use std::sync::Arc;
use std::time::Duration;

use sku_engine::cache::{CacheError, CacheResult, MemoryCache, SharedCache};
use sku_engine::{DbService, SkuConfig, SkuService, SqliteCatalog};

use shared::models::{BulkGenerateRequest, GenerateRequest};

async fn open_catalog(dir: &tempfile::TempDir) -> SqliteCatalog {
    let db_path = dir.path().join("catalog.db");
    let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();
    SqliteCatalog::new(db.pool)
}

async fn seed_brand(catalog: &SqliteCatalog, name: &str, code: &str) {
    sqlx::query("INSERT INTO brand (name, code, is_active, created_at) VALUES (?1, ?2, 1, ?3)")
        .bind(name)
        .bind(code)
        .bind(shared::util::now_millis())
        .execute(catalog.pool())
        .await
        .unwrap();
}

async fn seed_category(catalog: &SqliteCatalog, name: &str, code: &str) {
    sqlx::query("INSERT INTO category (name, code, is_active, created_at) VALUES (?1, ?2, 1, ?3)")
        .bind(name)
        .bind(code)
        .bind(shared::util::now_millis())
        .execute(catalog.pool())
        .await
        .unwrap();
}

async fn seed_product(catalog: &SqliteCatalog, name: &str, sku: &str) {
    sqlx::query("INSERT INTO product (name, sku, is_active, created_at) VALUES (?1, ?2, 1, ?3)")
        .bind(name)
        .bind(sku)
        .bind(shared::util::now_millis())
        .execute(catalog.pool())
        .await
        .unwrap();
}

fn service(catalog: SqliteCatalog) -> SkuService {
    SkuService::new(
        SkuConfig::with_overrides(10, 300),
        Arc::new(MemoryCache::new()),
        Arc::new(catalog),
    )
}

/// 模拟不可达的缓存（所有操作返回连接错误）
#[derive(Debug)]
struct FailingCache;

#[async_trait::async_trait]
impl SharedCache for FailingCache {
    async fn increment(&self, _key: &str) -> CacheResult<i64> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<bool> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> CacheResult<bool> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn bulk_generate_assigns_sequential_skus() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_catalog(&dir).await;
    seed_brand(&catalog, "Puma", "PUMA").await;
    seed_category(&catalog, "Accessories", "ACC").await;

    let svc = service(catalog);
    let results = svc
        .bulk_generate(vec![
            BulkGenerateRequest {
                brand: "PUMA".into(),
                category: "ACC".into(),
                size: None,
                color: None,
            },
            BulkGenerateRequest {
                brand: "PUMA".into(),
                category: "ACC".into(),
                size: None,
                color: None,
            },
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
    assert_eq!(results[0].sku.as_deref(), Some("PUMA-ACC-OS-NON-001"));
    assert_eq!(results[1].sku.as_deref(), Some("PUMA-ACC-OS-NON-002"));
}

#[tokio::test]
async fn bulk_generate_maps_per_item_errors() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_catalog(&dir).await;
    seed_brand(&catalog, "Puma", "PUMA").await;
    seed_category(&catalog, "Accessories", "ACC").await;

    let svc = service(catalog);
    let results = svc
        .bulk_generate(vec![
            BulkGenerateRequest {
                brand: "PUMA".into(),
                category: "ACC".into(),
                size: None,
                color: None,
            },
            BulkGenerateRequest {
                brand: "GHOST".into(),
                category: "ACC".into(),
                size: None,
                color: None,
            },
        ])
        .await;

    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].error.as_deref().unwrap().contains("GHOST"));
}

#[tokio::test]
async fn degraded_path_allocates_from_catalog_scan() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_catalog(&dir).await;
    seed_brand(&catalog, "Adidas", "ADIDAS").await;
    seed_category(&catalog, "T-Shirts", "TSH").await;
    seed_product(&catalog, "Classic Tee", "ADIDAS-TSH-M-RED-002").await;

    // Cache completely unreachable: allocation must still succeed
    let svc = SkuService::new(
        SkuConfig::with_overrides(10, 300),
        Arc::new(FailingCache),
        Arc::new(catalog),
    );

    let out = svc
        .generate(
            GenerateRequest::new("ADIDAS", "TSH").with_variant(Some("medium"), Some("red")),
        )
        .await
        .unwrap();

    assert_eq!(out.components.sequence, "003");
    assert_eq!(out.sku, "ADIDAS-TSH-M-RED-003");
    assert!(!out.reserved);

    // Degraded transitions are observable through analytics
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(svc.analytics().snapshot().degraded_fallbacks >= 1);
}

#[tokio::test]
async fn counter_backfills_from_committed_skus() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_catalog(&dir).await;
    seed_brand(&catalog, "Nike", "NIKE").await;
    seed_category(&catalog, "Shoes", "SHO").await;
    seed_product(&catalog, "Runner", "NIKE-SHO-L-BLK-041").await;

    let svc = service(catalog);
    let out = svc
        .generate(GenerateRequest::new("nike", "Shoes").with_variant(Some("L"), Some("black")))
        .await
        .unwrap();

    // Counter seeds from the committed max, never from zero
    assert_eq!(out.sku, "NIKE-SHO-L-BLK-042");
}

#[tokio::test]
async fn committed_collision_resolves_with_random_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = open_catalog(&dir).await;
    seed_brand(&catalog, "Nike", "NIKE").await;
    seed_category(&catalog, "Shoes", "SHO").await;
    seed_product(&catalog, "Runner", "NIKE-SHO-OS-NON-001").await;

    let svc = service(catalog);
    let mut req = GenerateRequest::new("NIKE", "SHO");
    req.custom_suffix = Some("001".into());
    let out = svc.generate(req).await.unwrap();

    assert_ne!(out.sku, "NIKE-SHO-OS-NON-001");
    assert!(out.sku.starts_with("NIKE-SHO-OS-NON-"));
    assert_eq!(out.components.sequence.len(), 3);
}
