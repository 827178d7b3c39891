//! AI Cache Service - 多层 AI 结果缓存
//!
//! 读取顺序（命中即返回）：
//! 1. 调用方传入的记录上已物化的字段（来自持久化记录）
//! 2. 本地 TTL 缓存
//! 3. 调用 Analyzer 计算
//!
//! 从第 1 层命中时回写本地缓存；计算得到的结果写入本地缓存，并提交到后台队列写回持久化记录。
//! 同一 ID 的并发未命中不做合并，各自计算、各自写入（后写覆盖）。

use std::sync::Arc;

use super::keys::{image_cache_id, CacheKind};
use super::local_cache::LocalAiCache;
use crate::application::error::ApplicationError;
use crate::application::ports::{AnalyzerPort, PersistJob, PersistQueuePort};
use crate::domain::wallpaper::{
    AnnotationUpdate, ContentId, ImageAnalysis, LensResult, Wallpaper, DEFAULT_EXTERNAL_PREFIXES,
};

/// 缓存服务配置
#[derive(Debug, Clone)]
pub struct AiCacheServiceConfig {
    /// 外部来源内容的 ID 前缀，这些内容没有可写的持久化记录
    pub external_prefixes: Vec<String>,
}

impl Default for AiCacheServiceConfig {
    fn default() -> Self {
        Self {
            external_prefixes: DEFAULT_EXTERNAL_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// AI Cache Service
pub struct AiCacheService {
    local: LocalAiCache,
    analyzer: Arc<dyn AnalyzerPort>,
    persist_queue: Arc<dyn PersistQueuePort>,
    config: AiCacheServiceConfig,
}

impl AiCacheService {
    pub fn new(
        local: LocalAiCache,
        analyzer: Arc<dyn AnalyzerPort>,
        persist_queue: Arc<dyn PersistQueuePort>,
        config: AiCacheServiceConfig,
    ) -> Self {
        Self {
            local,
            analyzer,
            persist_queue,
            config,
        }
    }

    pub fn local_cache(&self) -> &LocalAiCache {
        &self.local
    }

    /// 获取壁纸 insight
    ///
    /// 计算失败时返回错误，由调用方决定展示的兜底文本
    pub async fn get_insight(&self, wallpaper: &Wallpaper) -> Result<String, ApplicationError> {
        let id = wallpaper.id.as_str();

        if let Some(insight) = wallpaper.materialized_insight() {
            tracing::debug!(content_id = %id, "Insight served from record");
            self.local.set(CacheKind::Insight, id, &insight);
            return Ok(insight.to_string());
        }

        if let Some(insight) = self.local.get::<String>(CacheKind::Insight, id) {
            tracing::debug!(content_id = %id, "Insight served from local cache");
            return Ok(insight);
        }

        tracing::debug!(content_id = %id, "Insight cache miss, computing");
        let insight = self
            .analyzer
            .wallpaper_insight(&wallpaper.title, &wallpaper.tags)
            .await
            .map_err(|e| {
                tracing::warn!(content_id = %id, error = %e, "Insight computation failed");
                ApplicationError::from(e)
            })?;

        self.local.set(CacheKind::Insight, id, &insight);
        self.save_to_record_store(&wallpaper.id, AnnotationUpdate::insight(insight.clone()));

        Ok(insight)
    }

    /// 获取壁纸 Lens 分析
    ///
    /// 第 1 层要求描述和调色板都非空；计算以图片 URL 为输入而不是记录 ID
    pub async fn get_lens_analysis(
        &self,
        wallpaper: &Wallpaper,
    ) -> Result<LensResult, ApplicationError> {
        let id = wallpaper.id.as_str();

        if let Some(lens) = wallpaper.materialized_lens() {
            tracing::debug!(content_id = %id, "Lens analysis served from record");
            self.local.set(CacheKind::Lens, id, &lens);
            return Ok(lens);
        }

        if let Some(lens) = self.local.get::<LensResult>(CacheKind::Lens, id) {
            tracing::debug!(content_id = %id, "Lens analysis served from local cache");
            return Ok(lens);
        }

        if wallpaper.image_url.is_empty() {
            return Err(ApplicationError::validation(format!(
                "Wallpaper {} has no image URL",
                id
            )));
        }

        tracing::debug!(content_id = %id, "Lens cache miss, computing");
        let lens = self
            .analyzer
            .describe_for_lens(&wallpaper.image_url)
            .await
            .map_err(|e| {
                tracing::warn!(content_id = %id, error = %e, "Lens analysis failed");
                ApplicationError::from(e)
            })?;

        self.local.set(CacheKind::Lens, id, &lens);
        self.save_to_record_store(&wallpaper.id, AnnotationUpdate::lens(&lens));

        Ok(lens)
    }

    /// 分析上传中的图片
    ///
    /// 内容尚未发布，只使用本地缓存，不写持久化记录
    pub async fn get_image_analysis(
        &self,
        image_data: &str,
    ) -> Result<ImageAnalysis, ApplicationError> {
        if image_data.trim().is_empty() {
            return Err(ApplicationError::validation("Image data is empty"));
        }

        let image_id = image_cache_id(image_data);

        if let Some(analysis) = self.local.get::<ImageAnalysis>(CacheKind::Analysis, &image_id) {
            tracing::debug!(image_id = %image_id, "Image analysis served from local cache");
            return Ok(analysis);
        }

        tracing::debug!(image_id = %image_id, "Image analysis cache miss, computing");
        let analysis = self.analyzer.analyze_image(image_data).await.map_err(|e| {
            tracing::warn!(image_id = %image_id, error = %e, "Image analysis failed");
            ApplicationError::from(e)
        })?;

        self.local.set(CacheKind::Analysis, &image_id, &analysis);

        Ok(analysis)
    }

    /// 提交标注写回
    ///
    /// 外部来源内容和空更新直接跳过；提交后立即返回
    pub fn save_to_record_store(&self, content_id: &ContentId, update: AnnotationUpdate) {
        if content_id.is_external(&self.config.external_prefixes) {
            tracing::debug!(content_id = %content_id, "Skipping persistence for external content");
            return;
        }
        if update.is_empty() {
            return;
        }

        self.persist_queue.submit(PersistJob {
            content_id: content_id.clone(),
            update,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::local_cache::{LocalCacheConfig, DEFAULT_TTL_MS};
    use crate::application::ports::{
        AnalyzerError, LocalStoreError, LocalStorePort, ManualClock,
    };
    use crate::domain::wallpaper::ColorSwatch;
    use crate::infrastructure::memory::InMemoryLocalStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const T0: i64 = 1_700_000_000_000;

    /// 计数的 Analyzer
    #[derive(Default)]
    struct CountingAnalyzer {
        insight_calls: AtomicUsize,
        lens_calls: AtomicUsize,
        analysis_calls: AtomicUsize,
        lens_urls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl CountingAnalyzer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.insight_calls.load(Ordering::SeqCst)
                + self.lens_calls.load(Ordering::SeqCst)
                + self.analysis_calls.load(Ordering::SeqCst)
        }
    }

    fn sample_lens() -> LensResult {
        LensResult {
            description: "A rain-soaked street under neon signs".into(),
            colors: vec![
                ColorSwatch::new("Midnight", "#0b1026"),
                ColorSwatch::new("Neon Pink", "#ff2e88"),
            ],
            objects: vec!["street".into(), "signs".into()],
            style: "Cyberpunk".into(),
            search_terms: vec!["neon city".into()],
        }
    }

    fn sample_analysis() -> ImageAnalysis {
        ImageAnalysis {
            suggested_title: "Neon Rain".into(),
            description: "Night street".into(),
            tags: vec!["cyberpunk".into()],
            category: "City".into(),
            colors: vec![],
        }
    }

    #[async_trait]
    impl AnalyzerPort for CountingAnalyzer {
        async fn wallpaper_insight(
            &self,
            _title: &str,
            _tags: &[String],
        ) -> Result<String, AnalyzerError> {
            self.insight_calls.fetch_add(1, Ordering::SeqCst);
            // 模拟网络调用，让出执行权
            tokio::task::yield_now().await;
            if self.fail {
                return Err(AnalyzerError::ServiceError("rate limited".into()));
            }
            Ok("A bold aesthetic.".to_string())
        }

        async fn describe_for_lens(&self, image_url: &str) -> Result<LensResult, AnalyzerError> {
            self.lens_calls.fetch_add(1, Ordering::SeqCst);
            self.lens_urls.lock().unwrap().push(image_url.to_string());
            if self.fail {
                return Err(AnalyzerError::Timeout);
            }
            Ok(sample_lens())
        }

        async fn analyze_image(&self, _image_data: &str) -> Result<ImageAnalysis, AnalyzerError> {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AnalyzerError::NetworkError("offline".into()));
            }
            Ok(sample_analysis())
        }
    }

    /// 记录提交的写回任务
    #[derive(Default)]
    struct RecordingQueue {
        jobs: Mutex<Vec<PersistJob>>,
    }

    impl RecordingQueue {
        fn jobs(&self) -> Vec<PersistJob> {
            self.jobs.lock().unwrap().clone()
        }
    }

    impl PersistQueuePort for RecordingQueue {
        fn submit(&self, job: PersistJob) {
            self.jobs.lock().unwrap().push(job);
        }
    }

    /// 写入总是失败的存储
    #[derive(Default)]
    struct FullStore {
        inner: InMemoryLocalStore,
        removed: Mutex<Vec<String>>,
    }

    impl LocalStorePort for FullStore {
        fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::QuotaExceeded { needed: 1, quota: 0 })
        }

        fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
            self.removed.lock().unwrap().push(key.to_string());
            self.inner.remove(key)
        }

        fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError> {
            self.inner.keys_with_prefix(prefix)
        }
    }

    struct Harness {
        service: AiCacheService,
        analyzer: Arc<CountingAnalyzer>,
        queue: Arc<RecordingQueue>,
        clock: Arc<ManualClock>,
    }

    fn harness_with(store: Arc<dyn LocalStorePort>, analyzer: CountingAnalyzer) -> Harness {
        let analyzer = Arc::new(analyzer);
        let queue = Arc::new(RecordingQueue::default());
        let clock = Arc::new(ManualClock::new(T0));
        let local = LocalAiCache::new(store, clock.clone(), LocalCacheConfig::default());
        let service = AiCacheService::new(
            local,
            analyzer.clone(),
            queue.clone(),
            AiCacheServiceConfig::default(),
        );
        Harness {
            service,
            analyzer,
            queue,
            clock,
        }
    }

    fn harness() -> (Harness, Arc<InMemoryLocalStore>) {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        (harness_with(store.clone(), CountingAnalyzer::default()), store)
    }

    fn wallpaper(id: &str) -> Wallpaper {
        Wallpaper::new(
            ContentId::new(id).unwrap(),
            "Neon Rain",
            format!("https://cdn.example.com/{}.jpg", id),
        )
        .with_tags(["cyberpunk", "city"])
    }

    #[tokio::test]
    async fn test_materialized_insight_is_idempotent_and_never_computes() {
        let (h, store) = harness();
        let mut w = wallpaper("c1");
        w.ai_insight = Some("Stored insight.".into());

        let first = h.service.get_insight(&w).await.unwrap();
        let second = h.service.get_insight(&w).await.unwrap();

        assert_eq!(first, "Stored insight.");
        assert_eq!(first, second);
        assert_eq!(h.analyzer.calls(), 0);
        assert!(h.queue.jobs().is_empty());
        // 第 1 层命中会预热本地缓存
        assert!(store.get("aura_ai_insight_c1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_materialized_insight_refreshes_local_expiry() {
        let (h, store) = harness();
        let mut w = wallpaper("c1");
        w.ai_insight = Some("Stored insight.".into());

        h.service.get_insight(&w).await.unwrap();
        h.clock.advance(1_000);
        h.service.get_insight(&w).await.unwrap();

        let raw = store.get("aura_ai_insight_c1").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["expiry"].as_i64(), Some(T0 + 1_000 + DEFAULT_TTL_MS));
    }

    #[tokio::test]
    async fn test_insight_miss_computes_caches_and_persists() {
        let (h, store) = harness();
        let w = wallpaper("c1");

        let insight = h.service.get_insight(&w).await.unwrap();

        assert_eq!(insight, "A bold aesthetic.");
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 1);

        let raw = store.get("aura_ai_insight_c1").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["data"], "A bold aesthetic.");
        assert_eq!(json["expiry"].as_i64(), Some(T0 + DEFAULT_TTL_MS));

        assert_eq!(
            h.queue.jobs(),
            vec![PersistJob {
                content_id: ContentId::new("c1").unwrap(),
                update: AnnotationUpdate::insight("A bold aesthetic."),
            }]
        );
    }

    #[tokio::test]
    async fn test_second_call_is_served_locally() {
        let (h, _store) = harness();
        let w = wallpaper("c1");

        h.service.get_insight(&w).await.unwrap();
        // 记录仍然没有 aiInsight（持久化尚未完成）
        let again = h.service.get_insight(&w).await.unwrap();

        assert_eq!(again, "A bold aesthetic.");
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.queue.jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_local_entry_recomputes() {
        let (h, _store) = harness();
        let w = wallpaper("c1");

        h.service.get_insight(&w).await.unwrap();
        h.clock.advance(DEFAULT_TTL_MS - 1);
        h.service.get_insight(&w).await.unwrap();
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 1);

        h.clock.advance(2);
        h.service.get_insight(&w).await.unwrap();
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_materialized_insight_falls_through() {
        let (h, _store) = harness();
        let mut w = wallpaper("c1");
        w.ai_insight = Some(String::new());

        assert_eq!(h.service.get_insight(&w).await.unwrap(), "A bold aesthetic.");
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compute_failure_propagates_without_caching() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let h = harness_with(store.clone(), CountingAnalyzer::failing());
        let w = wallpaper("c1");

        let err = h.service.get_insight(&w).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
        assert!(store.is_empty());
        assert!(h.queue.jobs().is_empty());

        let err = h.service.get_lens_analysis(&w).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
        assert!(store.is_empty());
        assert!(h.queue.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_lens_with_empty_palette_is_tier_one_miss() {
        let (h, _store) = harness();
        let mut w = wallpaper("c1");
        w.ai_description = Some("Stored description".into());
        w.ai_colors = Some(vec![]);

        let lens = h.service.get_lens_analysis(&w).await.unwrap();

        assert_eq!(lens, sample_lens());
        assert_eq!(h.analyzer.lens_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_materialized_lens_uses_defaults() {
        let (h, store) = harness();
        let mut w = wallpaper("c1");
        w.ai_description = Some("Stored description".into());
        w.ai_colors = Some(vec![ColorSwatch::new("Sand", "#e2c290")]);

        let lens = h.service.get_lens_analysis(&w).await.unwrap();

        assert_eq!(lens.description, "Stored description");
        assert_eq!(lens.style, crate::domain::wallpaper::DEFAULT_LENS_STYLE);
        assert!(lens.objects.is_empty());
        assert!(lens.search_terms.is_empty());
        assert_eq!(h.analyzer.calls(), 0);
        assert!(store.get("aura_ai_lens_c1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lens_miss_computes_from_image_url_and_persists_all_fields() {
        let (h, _store) = harness();
        let w = wallpaper("c1");

        let lens = h.service.get_lens_analysis(&w).await.unwrap();
        assert_eq!(lens, sample_lens());
        assert_eq!(
            *h.analyzer.lens_urls.lock().unwrap(),
            vec!["https://cdn.example.com/c1.jpg".to_string()]
        );

        let jobs = h.queue.jobs();
        assert_eq!(jobs.len(), 1);
        let update = &jobs[0].update;
        assert_eq!(update, &AnnotationUpdate::lens(&sample_lens()));
        assert!(update.ai_insight.is_none());

        // 第二次从本地缓存读取
        h.service.get_lens_analysis(&w).await.unwrap();
        assert_eq!(h.analyzer.lens_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_insight_and_lens_keys_do_not_collide() {
        let (h, store) = harness();
        let w = wallpaper("c1");

        h.service.get_insight(&w).await.unwrap();
        h.service.get_lens_analysis(&w).await.unwrap();

        assert!(store.get("aura_ai_insight_c1").unwrap().is_some());
        assert!(store.get("aura_ai_lens_c1").unwrap().is_some());
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.analyzer.lens_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_external_content_is_never_persisted() {
        let (h, store) = harness();
        let w = wallpaper("pexels-1181244");

        h.service.get_insight(&w).await.unwrap();
        h.service.get_lens_analysis(&w).await.unwrap();
        h.service.save_to_record_store(&w.id, AnnotationUpdate::insight("x"));

        assert!(h.queue.jobs().is_empty());
        // 本地缓存照常写入
        assert!(store.get("aura_ai_insight_pexels-1181244").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_update_is_not_submitted() {
        let (h, _store) = harness();
        h.service
            .save_to_record_store(&ContentId::new("c1").unwrap(), AnnotationUpdate::default());
        assert!(h.queue.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_image_analysis_uses_hashed_key_and_local_tier_only() {
        let (h, store) = harness();
        let image = "data:image/png;base64,abc";

        let first = h.service.get_image_analysis(image).await.unwrap();
        let second = h.service.get_image_analysis("abc").await.unwrap();

        assert_eq!(first, sample_analysis());
        assert_eq!(first, second);
        assert_eq!(h.analyzer.analysis_calls.load(Ordering::SeqCst), 1);
        assert!(store.get("aura_ai_analysis_22ci").unwrap().is_some());
        assert!(h.queue.jobs().is_empty());
    }

    #[tokio::test]
    async fn test_empty_image_is_rejected() {
        let (h, _store) = harness();
        let err = h.service.get_image_analysis("  ").await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(h.analyzer.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_store_evicts_five_and_still_returns_value() {
        let store = Arc::new(FullStore::default());
        for id in ["a", "b", "c", "d", "e", "f", "g"] {
            store
                .inner
                .set(&format!("aura_ai_insight_{}", id), r#"{"data":"x","expiry":0}"#)
                .unwrap();
        }
        let h = harness_with(store.clone(), CountingAnalyzer::default());

        let insight = h.service.get_insight(&wallpaper("c1")).await.unwrap();

        assert_eq!(insight, "A bold aesthetic.");
        assert_eq!(store.removed.lock().unwrap().len(), 5);
        // 缓存失败不影响写回
        assert_eq!(h.queue.jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_not_coalesced() {
        let (h, _store) = harness();
        let w = wallpaper("c1");

        let (a, b) = tokio::join!(h.service.get_insight(&w), h.service.get_insight(&w));
        assert_eq!(a.unwrap(), b.unwrap());
        // 两次调用都越过了本地缓存检查，各自计算一次
        assert_eq!(h.analyzer.insight_calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.queue.jobs().len(), 2);
    }
}
