//! SKU 服务门面
//!
//! `SkuService` 串联五个组件：解析引用 → 规范化 → 分配序列号 →
//! 唯一性校验 → （可选）预留。调用方契约：
//! - `generate` 返回 `{sku, components, reserved}`
//! - 产品提交成功后调用 `release(sku, holder)`；
//!   中止时也应调用，但遗漏可由 TTL 兜底
//! - `bulk_generate` 逐项独立处理，引用查找只解析一次

use std::collections::HashMap;
use std::sync::Arc;

use shared::models::{
    BulkGenerateRequest, BulkGenerateResult, GenerateRequest, GeneratedSku, SkuComponents,
};

use crate::analytics::{SkuAnalytics, SkuEvent, SkuEventKind};
use crate::cache::SharedCache;
use crate::catalog::CatalogStore;
use crate::core::{SkuConfig, SkuError, SkuResult};
use crate::format::{formatter, normalizer};
use crate::reserve::{ReservationManager, ReserveOutcome};
use crate::sequence::SequenceAllocator;
use crate::verify::UniquenessVerifier;

/// SKU 生成与预留服务
#[derive(Clone)]
pub struct SkuService {
    config: SkuConfig,
    catalog: Arc<dyn CatalogStore>,
    allocator: SequenceAllocator,
    verifier: UniquenessVerifier,
    reservations: ReservationManager,
    analytics: SkuAnalytics,
}

impl SkuService {
    /// 组装服务（内部启动分析 worker）
    pub fn new(
        config: SkuConfig,
        cache: Arc<dyn SharedCache>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        let analytics = SkuAnalytics::spawn(config.analytics_buffer);
        let reservations =
            ReservationManager::new(Arc::clone(&cache), analytics.clone(), &config);
        let allocator = SequenceAllocator::new(
            Arc::clone(&cache),
            Arc::clone(&catalog),
            analytics.clone(),
            &config,
        );
        let verifier = UniquenessVerifier::new(
            Arc::clone(&catalog),
            reservations.clone(),
            analytics.clone(),
            &config,
        );
        Self {
            config,
            catalog,
            allocator,
            verifier,
            reservations,
            analytics,
        }
    }

    // ========== 生成 ==========

    /// 生成一个唯一 SKU；带 `holder_id` 时同时获取预留
    pub async fn generate(&self, req: GenerateRequest) -> SkuResult<GeneratedSku> {
        let brand_code = self.resolve_brand_code(&req.brand).await?;
        let category_code = self.resolve_category_code(&req.category).await?;
        self.generate_resolved(
            &brand_code,
            &category_code,
            req.size.as_deref(),
            req.color.as_deref(),
            req.custom_suffix.as_deref(),
            req.holder_id.as_deref(),
        )
        .await
    }

    /// 批量生成（逐项独立，引用只解析一次；批量模式不做预留）
    pub async fn bulk_generate(
        &self,
        requests: Vec<BulkGenerateRequest>,
    ) -> Vec<BulkGenerateResult> {
        // 预解析去重后的品牌/分类引用，避免重复目录查询
        let mut brand_codes: HashMap<String, Result<String, String>> = HashMap::new();
        let mut category_codes: HashMap<String, Result<String, String>> = HashMap::new();
        for req in &requests {
            if !brand_codes.contains_key(&req.brand) {
                let resolved = self
                    .resolve_brand_code(&req.brand)
                    .await
                    .map_err(|e| e.to_string());
                brand_codes.insert(req.brand.clone(), resolved);
            }
            if !category_codes.contains_key(&req.category) {
                let resolved = self
                    .resolve_category_code(&req.category)
                    .await
                    .map_err(|e| e.to_string());
                category_codes.insert(req.category.clone(), resolved);
            }
        }

        let mut results = Vec::with_capacity(requests.len());
        for req in &requests {
            let brand_code = match &brand_codes[&req.brand] {
                Ok(code) => code.clone(),
                Err(e) => {
                    results.push(BulkGenerateResult::err(e.clone()));
                    continue;
                }
            };
            let category_code = match &category_codes[&req.category] {
                Ok(code) => code.clone(),
                Err(e) => {
                    results.push(BulkGenerateResult::err(e.clone()));
                    continue;
                }
            };

            let result = self
                .generate_resolved(
                    &brand_code,
                    &category_code,
                    req.size.as_deref(),
                    req.color.as_deref(),
                    None,
                    None,
                )
                .await;
            results.push(match result {
                Ok(generated) => BulkGenerateResult::ok(generated.sku),
                Err(e) => BulkGenerateResult::err(e.to_string()),
            });
        }
        results
    }

    /// 校验 SKU 格式（best-effort，不查库）
    pub fn validate(&self, sku: &str) -> Option<SkuComponents> {
        self.analytics.record_kind(SkuEventKind::Validated, sku);
        formatter::parse(sku)
    }

    // ========== 预留透传 ==========

    /// 显式预留一个 SKU（已被持有时返回 ReservationConflict）
    pub async fn reserve(
        &self,
        sku: &str,
        holder_id: &str,
        ttl_secs: Option<u64>,
    ) -> SkuResult<ReserveOutcome> {
        let outcome = self.reservations.reserve(sku, holder_id, ttl_secs).await?;
        if !outcome.acquired {
            return Err(SkuError::ReservationConflict(sku.to_string()));
        }
        Ok(outcome)
    }

    /// 释放预留（持有者必须匹配；幂等）
    pub async fn release(&self, sku: &str, holder_id: &str) -> SkuResult<bool> {
        self.reservations.release(sku, holder_id).await
    }

    /// 无条件释放（运维逃生通道）
    pub async fn force_release(&self, sku: &str) -> SkuResult<()> {
        self.reservations.force_release(sku).await
    }

    /// 是否存在存活预留
    pub async fn is_reserved(&self, sku: &str) -> SkuResult<bool> {
        self.reservations.is_reserved(sku).await
    }

    /// 分析计数器访问
    pub fn analytics(&self) -> &SkuAnalytics {
        &self.analytics
    }

    // ========== 内部 ==========

    async fn generate_resolved(
        &self,
        brand_code: &str,
        category_code: &str,
        size: Option<&str>,
        color: Option<&str>,
        custom_suffix: Option<&str>,
        holder_id: Option<&str>,
    ) -> SkuResult<GeneratedSku> {
        let size_code = normalizer::normalize_size(size);
        let color_code = normalizer::normalize_color(color);

        let sequence = match custom_suffix {
            Some(suffix) => normalize_suffix(suffix)?,
            None => self.allocator.next(brand_code, category_code).await?,
        };

        let candidate =
            formatter::build(brand_code, category_code, &size_code, &color_code, &sequence)?;
        let mut sku = self.verifier.ensure_unique(&candidate, holder_id).await?;

        let mut reserved = false;
        if let Some(holder) = holder_id {
            reserved = self.reserve_verified(&mut sku, holder).await?;
        }

        // ensure_unique only ever returns build/parse-clean strings
        let components = formatter::parse(&sku).ok_or_else(|| {
            SkuError::invalid_component("sku", format!("unparseable result '{sku}'"))
        })?;

        self.analytics.record(match holder_id {
            Some(holder) => SkuEvent::new(SkuEventKind::Generated, &sku).tag("holder", holder),
            None => SkuEvent::new(SkuEventKind::Generated, &sku),
        });

        Ok(GeneratedSku {
            sku,
            components,
            reserved,
        })
    }

    /// 预留已校验的 SKU；校验与预留之间的竞态窗口内输掉的话，
    /// 重新进入校验循环换候选
    async fn reserve_verified(&self, sku: &mut String, holder: &str) -> SkuResult<bool> {
        for _ in 0..self.config.max_attempts {
            match self.reservations.reserve(sku, holder, None).await {
                Ok(outcome) if outcome.acquired => return Ok(true),
                Ok(_) => {
                    // 同一持有者重复 generate 的幂等情形
                    if self.reservations.holder_of(sku).await? == Some(holder.to_string()) {
                        return Ok(true);
                    }
                    *sku = self.verifier.ensure_unique(sku, Some(holder)).await?;
                }
                Err(SkuError::Cache(e)) => {
                    // 生成本身必须在缓存故障下存活；互斥保护降级为无
                    tracing::warn!(
                        sku = %sku.as_str(),
                        error = %e,
                        "Reservation skipped, cache unavailable"
                    );
                    return Ok(false);
                }
                Err(e) => return Err(e),
            }
        }
        Err(SkuError::SkuExhausted {
            candidate: sku.clone(),
            attempts: self.config.max_attempts,
        })
    }

    async fn resolve_brand_code(&self, reference: &str) -> SkuResult<String> {
        let brand = self
            .catalog
            .find_brand(reference)
            .await?
            .ok_or_else(|| SkuError::reference_not_found(format!("brand '{reference}'")))?;
        match brand.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Ok(code.to_uppercase()),
            None => Err(SkuError::missing_code(format!("brand '{}'", brand.name))),
        }
    }

    async fn resolve_category_code(&self, reference: &str) -> SkuResult<String> {
        let category = self
            .catalog
            .find_category(reference)
            .await?
            .ok_or_else(|| SkuError::reference_not_found(format!("category '{reference}'")))?;
        match category.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Ok(code.to_uppercase()),
            None => Err(SkuError::missing_code(format!("category '{}'", category.name))),
        }
    }
}

/// 自定义后缀：大写化并校验字符集（跳过分配器，不跳过唯一性校验）
fn normalize_suffix(suffix: &str) -> SkuResult<String> {
    let upper = suffix.trim().to_uppercase();
    if upper.is_empty() || !upper.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(SkuError::invalid_component(
            "custom_suffix",
            format!("'{suffix}' must be non-empty [A-Za-z0-9]"),
        ));
    }
    Ok(upper)
}
