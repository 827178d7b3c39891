//! 本地 AI 结果缓存
//!
//! 在本地键值存储之上提供带 TTL 的 JSON 条目：
//! - 读取时过期或损坏的条目直接删除（惰性删除，无后台清理）
//! - 写入失败时淘汰一批条目后重试一次，仍失败则放弃写入
//! - 缓存失败从不影响调用方拿到的结果

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::keys::{cache_key, CacheKind, DEFAULT_NAMESPACE};
use crate::application::ports::{Clock, LocalStorePort};

/// 默认 TTL：7 天
pub const DEFAULT_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// 可配置的 TTL 上限：365 天
pub const MAX_TTL_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// 每次淘汰的条目数
pub const DEFAULT_EVICT_BATCH: usize = 5;

/// 缓存条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// 绝对过期时间（Unix 毫秒）
    pub expiry: i64,
}

impl<T> CacheEntry<T> {
    /// `now <= expiry` 时有效
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms <= self.expiry
    }
}

/// 淘汰顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// key 按字典序排序后淘汰最前面的一批（与前端已有行为一致，不等于最旧优先）
    #[default]
    Lexicographic,
    /// 按写入时间（过期时间）从旧到新淘汰，无法解析的条目最先淘汰
    OldestWritten,
}

/// 本地缓存配置
#[derive(Debug, Clone)]
pub struct LocalCacheConfig {
    pub namespace: String,
    pub ttl_ms: i64,
    pub evict_batch: usize,
    pub eviction: EvictionPolicy,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl_ms: DEFAULT_TTL_MS,
            evict_batch: DEFAULT_EVICT_BATCH,
            eviction: EvictionPolicy::default(),
        }
    }
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Stored,
    StoredAfterEviction,
    Dropped,
}

/// 命名空间下的条目统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalCacheStats {
    pub insight: usize,
    pub lens: usize,
    pub analysis: usize,
    pub total: usize,
}

/// 本地 AI 缓存
pub struct LocalAiCache {
    store: Arc<dyn LocalStorePort>,
    clock: Arc<dyn Clock>,
    config: LocalCacheConfig,
}

impl LocalAiCache {
    pub fn new(
        store: Arc<dyn LocalStorePort>,
        clock: Arc<dyn Clock>,
        config: LocalCacheConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn key(&self, kind: CacheKind, identifier: &str) -> String {
        cache_key(&self.config.namespace, kind, identifier)
    }

    /// 读取未过期的条目
    pub fn get<T: DeserializeOwned>(&self, kind: CacheKind, identifier: &str) -> Option<T> {
        let key = self.key(kind, identifier);

        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "Local cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Local cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Malformed local cache entry, removing");
                self.remove_quietly(&key);
                return None;
            }
        };

        if !entry.is_valid_at(self.clock.now_ms()) {
            tracing::debug!(key = %key, expiry = entry.expiry, "Local cache entry expired");
            self.remove_quietly(&key);
            return None;
        }

        tracing::debug!(key = %key, "Local cache hit");
        Some(entry.data)
    }

    /// 写入条目，过期时间重置为 now + ttl
    pub fn set<T: Serialize>(&self, kind: CacheKind, identifier: &str, data: &T) -> WriteOutcome {
        let key = self.key(kind, identifier);
        let entry = CacheEntry {
            data,
            expiry: self.clock.now_ms().saturating_add(self.config.ttl_ms),
        };

        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode local cache entry");
                return WriteOutcome::Dropped;
            }
        };

        let first_error = match self.store.set(&key, &payload) {
            Ok(()) => return WriteOutcome::Stored,
            Err(e) => e,
        };

        let evicted = self.evict();
        tracing::warn!(
            key = %key,
            error = %first_error,
            evicted = evicted,
            "Local cache write failed, evicted entries and retrying"
        );

        match self.store.set(&key, &payload) {
            Ok(()) => WriteOutcome::StoredAfterEviction,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Local cache write dropped after eviction");
                WriteOutcome::Dropped
            }
        }
    }

    /// 淘汰一批命名空间下的条目，返回删除数量
    fn evict(&self) -> usize {
        let candidates = self.eviction_candidates();
        let mut removed = 0;

        for key in candidates.into_iter().take(self.config.evict_batch) {
            match self.store.remove(&key) {
                Ok(()) => {
                    removed += 1;
                    tracing::debug!(key = %key, "Evicted local cache entry");
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "Failed to evict entry"),
            }
        }

        removed
    }

    /// 按淘汰顺序排列的 key
    fn eviction_candidates(&self) -> Vec<String> {
        let mut keys = match self.store.keys_with_prefix(&self.config.namespace) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list local cache keys");
                return Vec::new();
            }
        };

        match self.config.eviction {
            EvictionPolicy::Lexicographic => keys.sort(),
            EvictionPolicy::OldestWritten => {
                let mut aged: Vec<(i64, String)> = keys
                    .drain(..)
                    .map(|key| (self.stored_expiry(&key).unwrap_or(i64::MIN), key))
                    .collect();
                aged.sort();
                keys = aged.into_iter().map(|(_, key)| key).collect();
            }
        }

        keys
    }

    fn stored_expiry(&self, key: &str) -> Option<i64> {
        let raw = self.store.get(key).ok()??;
        serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw)
            .ok()
            .map(|entry| entry.expiry)
    }

    fn remove_quietly(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key = %key, error = %e, "Failed to remove local cache entry");
        }
    }

    /// 清空命名空间下的所有条目，返回删除数量
    pub fn clear(&self) -> usize {
        let keys = match self.store.keys_with_prefix(&self.config.namespace) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list local cache keys");
                return 0;
            }
        };

        let removed = keys
            .iter()
            .filter(|key| self.store.remove(key).is_ok())
            .count();
        tracing::info!(namespace = %self.config.namespace, removed = removed, "Local cache cleared");
        removed
    }

    /// 统计命名空间下各类别的条目数（包括尚未被惰性删除的过期条目）
    pub fn stats(&self) -> LocalCacheStats {
        let keys = self
            .store
            .keys_with_prefix(&self.config.namespace)
            .unwrap_or_default();

        let mut stats = LocalCacheStats {
            total: keys.len(),
            ..Default::default()
        };
        for key in &keys {
            let Some(rest) = key.strip_prefix(self.config.namespace.as_str()) else {
                continue;
            };
            let kind = CacheKind::ALL.into_iter().find(|kind| {
                rest.strip_prefix(kind.as_str())
                    .is_some_and(|tail| tail.starts_with('_'))
            });
            match kind {
                Some(CacheKind::Insight) => stats.insight += 1,
                Some(CacheKind::Lens) => stats.lens += 1,
                Some(CacheKind::Analysis) => stats.analysis += 1,
                None => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{LocalStoreError, ManualClock};
    use crate::infrastructure::memory::InMemoryLocalStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const T0: i64 = 1_700_000_000_000;

    fn cache_with(store: Arc<dyn LocalStorePort>, clock: Arc<ManualClock>) -> LocalAiCache {
        LocalAiCache::new(store, clock, LocalCacheConfig::default())
    }

    /// 前 `failures` 次写入失败的存储，记录删除的 key
    struct FlakyStore {
        inner: InMemoryLocalStore,
        failures: AtomicUsize,
        removed: Mutex<Vec<String>>,
    }

    impl FlakyStore {
        fn new(failures: usize) -> Self {
            Self {
                inner: InMemoryLocalStore::unbounded(),
                failures: AtomicUsize::new(failures),
                removed: Mutex::new(Vec::new()),
            }
        }

        fn removed(&self) -> Vec<String> {
            self.removed.lock().unwrap().clone()
        }
    }

    impl LocalStorePort for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(LocalStoreError::QuotaExceeded { needed: 1, quota: 0 });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
            self.removed.lock().unwrap().push(key.to_string());
            self.inner.remove(key)
        }

        fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LocalStoreError> {
            self.inner.keys_with_prefix(prefix)
        }
    }

    #[test]
    fn test_set_then_get() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_with(Arc::new(InMemoryLocalStore::unbounded()), clock);

        assert_eq!(cache.set(CacheKind::Insight, "c1", &"A bold aesthetic."), WriteOutcome::Stored);
        assert_eq!(
            cache.get::<String>(CacheKind::Insight, "c1").as_deref(),
            Some("A bold aesthetic.")
        );
        assert!(cache.get::<String>(CacheKind::Lens, "c1").is_none());
    }

    #[test]
    fn test_entry_is_stored_as_json_with_absolute_expiry() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        cache.set(CacheKind::Insight, "c1", &"A bold aesthetic.");

        let raw = store.get("aura_ai_insight_c1").unwrap().unwrap();
        let entry: CacheEntry<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.data, "A bold aesthetic.");
        assert_eq!(entry.expiry, T0 + DEFAULT_TTL_MS);
    }

    #[test]
    fn test_expiry_boundary() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_with(store.clone(), clock.clone());

        cache.set(CacheKind::Insight, "c1", &"hello");

        clock.set(T0 + DEFAULT_TTL_MS - 1);
        assert!(cache.get::<String>(CacheKind::Insight, "c1").is_some());

        clock.set(T0 + DEFAULT_TTL_MS);
        assert!(cache.get::<String>(CacheKind::Insight, "c1").is_some());

        clock.set(T0 + DEFAULT_TTL_MS + 1);
        assert!(cache.get::<String>(CacheKind::Insight, "c1").is_none());
        // 过期条目被惰性删除
        assert!(store.get("aura_ai_insight_c1").unwrap().is_none());
    }

    #[test]
    fn test_rewrite_resets_expiry() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = cache_with(Arc::new(InMemoryLocalStore::unbounded()), clock.clone());

        cache.set(CacheKind::Insight, "c1", &"hello");
        clock.advance(DEFAULT_TTL_MS - 10);
        cache.set(CacheKind::Insight, "c1", &"hello");
        clock.advance(100);

        assert!(cache.get::<String>(CacheKind::Insight, "c1").is_some());
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_overflowing() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let clock = Arc::new(ManualClock::new(T0));
        let cache = LocalAiCache::new(
            store.clone(),
            clock.clone(),
            LocalCacheConfig {
                ttl_ms: i64::MAX,
                ..Default::default()
            },
        );

        assert_eq!(cache.set(CacheKind::Insight, "c1", &"x"), WriteOutcome::Stored);

        let raw = store.get("aura_ai_insight_c1").unwrap().unwrap();
        let entry: CacheEntry<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry.expiry, i64::MAX);

        clock.advance(DEFAULT_TTL_MS * 100);
        assert_eq!(cache.get::<String>(CacheKind::Insight, "c1").as_deref(), Some("x"));
    }

    #[test]
    fn test_malformed_entry_is_removed() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        store.set("aura_ai_insight_c1", "{not json").unwrap();
        assert!(cache.get::<String>(CacheKind::Insight, "c1").is_none());
        assert!(store.get("aura_ai_insight_c1").unwrap().is_none());

        // 缺少字段同样视为损坏
        store.set("aura_ai_insight_c2", r#"{"data":"x"}"#).unwrap();
        assert!(cache.get::<String>(CacheKind::Insight, "c2").is_none());
        assert!(store.get("aura_ai_insight_c2").unwrap().is_none());
    }

    #[test]
    fn test_eviction_removes_five_lexicographic_keys_then_retries() {
        let store = Arc::new(FlakyStore::new(0));
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        for id in ["g", "c", "a", "f", "b", "e", "d"] {
            cache.set(CacheKind::Insight, id, &id);
        }
        store.inner.set("unrelated_key", "keep").unwrap();
        store.failures.store(1, Ordering::SeqCst);

        assert_eq!(
            cache.set(CacheKind::Insight, "z", &"z"),
            WriteOutcome::StoredAfterEviction
        );

        let removed = store.removed();
        assert_eq!(
            removed,
            vec![
                "aura_ai_insight_a",
                "aura_ai_insight_b",
                "aura_ai_insight_c",
                "aura_ai_insight_d",
                "aura_ai_insight_e",
            ]
        );
        assert_eq!(cache.get::<String>(CacheKind::Insight, "z").as_deref(), Some("z"));
        assert!(store.get("unrelated_key").unwrap().is_some());
    }

    #[test]
    fn test_retry_failure_drops_write() {
        let store = Arc::new(FlakyStore::new(0));
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        for id in ["a", "b", "c", "d", "e", "f"] {
            cache.set(CacheKind::Lens, id, &id);
        }
        store.failures.store(2, Ordering::SeqCst);

        assert_eq!(cache.set(CacheKind::Insight, "z", &"z"), WriteOutcome::Dropped);
        assert_eq!(store.removed().len(), 5);
        assert!(cache.get::<String>(CacheKind::Insight, "z").is_none());
    }

    #[test]
    fn test_oldest_written_eviction_order() {
        let store = Arc::new(FlakyStore::new(0));
        let clock = Arc::new(ManualClock::new(T0));
        let config = LocalCacheConfig {
            evict_batch: 2,
            eviction: EvictionPolicy::OldestWritten,
            ..Default::default()
        };
        let cache = LocalAiCache::new(store.clone(), clock.clone(), config);

        // 写入顺序与字典序相反
        for id in ["c", "b", "a"] {
            clock.advance(1_000);
            cache.set(CacheKind::Insight, id, &id);
        }
        store.failures.store(1, Ordering::SeqCst);
        cache.set(CacheKind::Insight, "z", &"z");

        assert_eq!(store.removed(), vec!["aura_ai_insight_c", "aura_ai_insight_b"]);
    }

    #[test]
    fn test_real_quota_triggers_eviction() {
        let store = Arc::new(InMemoryLocalStore::new(400));
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        let mut outcomes = Vec::new();
        for i in 0..20 {
            outcomes.push(cache.set(CacheKind::Insight, &format!("c{:02}", i), &"x".repeat(20)));
        }

        assert!(outcomes.contains(&WriteOutcome::StoredAfterEviction));
        assert!(store.size_bytes() <= 400);
        // 最新写入的条目总是可读
        assert!(cache.get::<String>(CacheKind::Insight, "c19").is_some());
    }

    #[test]
    fn test_clear_and_stats() {
        let store = Arc::new(InMemoryLocalStore::unbounded());
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(T0)));

        cache.set(CacheKind::Insight, "c1", &"a");
        cache.set(CacheKind::Insight, "c2", &"b");
        cache.set(CacheKind::Lens, "c1", &"c");
        cache.set(CacheKind::Analysis, "22ci", &"d");
        store.set("theme", "dark").unwrap();

        let stats = cache.stats();
        assert_eq!(
            stats,
            LocalCacheStats {
                insight: 2,
                lens: 1,
                analysis: 1,
                total: 4,
            }
        );

        assert_eq!(cache.clear(), 4);
        assert_eq!(cache.stats().total, 0);
        assert!(store.get("theme").unwrap().is_some());
    }

    #[test]
    fn test_isolated_namespaces_share_store() {
        let store: Arc<dyn LocalStorePort> = Arc::new(InMemoryLocalStore::unbounded());
        let clock = Arc::new(ManualClock::new(T0));
        let a = LocalAiCache::new(store.clone(), clock.clone(), LocalCacheConfig::default());
        let b = LocalAiCache::new(
            store,
            clock,
            LocalCacheConfig {
                namespace: "test_ns_".into(),
                ..Default::default()
            },
        );

        a.set(CacheKind::Insight, "c1", &"from a");
        assert!(b.get::<String>(CacheKind::Insight, "c1").is_none());
        assert_eq!(b.clear(), 0);
        assert!(a.get::<String>(CacheKind::Insight, "c1").is_some());
    }
}
