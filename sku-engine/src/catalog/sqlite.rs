//! SQLite Catalog Store

use async_trait::async_trait;
use shared::models::{Brand, Category};
use sqlx::SqlitePool;

use super::{CatalogResult, CatalogStore};
use crate::format::formatter;

/// Catalog store backed by the SQLite catalog database
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_brand(&self, reference: &str) -> CatalogResult<Option<Brand>> {
        let code = reference.trim().to_uppercase();
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, code, is_active FROM brand \
             WHERE is_active = 1 AND (code = ?1 OR LOWER(name) = LOWER(?2)) LIMIT 1",
        )
        .bind(&code)
        .bind(reference.trim())
        .fetch_optional(&self.pool)
        .await?;
        if brand.is_some() {
            return Ok(brand);
        }

        // Numeric id as a last resort
        let Ok(id) = reference.trim().parse::<i64>() else {
            return Ok(None);
        };
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, code, is_active FROM brand WHERE is_active = 1 AND id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(brand)
    }

    async fn find_category(&self, reference: &str) -> CatalogResult<Option<Category>> {
        let code = reference.trim().to_uppercase();
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, code, is_active FROM category \
             WHERE is_active = 1 AND (code = ?1 OR LOWER(name) = LOWER(?2)) LIMIT 1",
        )
        .bind(&code)
        .bind(reference.trim())
        .fetch_optional(&self.pool)
        .await?;
        if category.is_some() {
            return Ok(category);
        }

        let Ok(id) = reference.trim().parse::<i64>() else {
            return Ok(None);
        };
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, code, is_active FROM category WHERE is_active = 1 AND id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn sku_exists(&self, sku: &str) -> CatalogResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM product WHERE sku = ?1 AND is_active = 1")
                .bind(sku)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn find_max_sequence(&self, prefix: &str) -> CatalogResult<Option<u64>> {
        // SKU charset is [A-Z0-9-], so the prefix needs no LIKE escaping.
        // Max 取数值比较：字典序在超出固定宽度后会出错（"010" < "9"）。
        let skus: Vec<String> =
            sqlx::query_scalar("SELECT sku FROM product WHERE sku LIKE ?1 || '%'")
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;

        let max = skus
            .iter()
            .filter_map(|sku| formatter::parse(sku))
            .filter_map(|c| c.sequence.parse::<u64>().ok())
            .max();
        Ok(max)
    }
}
