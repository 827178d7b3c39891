//! AI 结果缓存
//!
//! - keys: 缓存 key 规则与上传图片散列
//! - local_cache: 本地 TTL 缓存（过期、损坏条目处理、容量淘汰）
//! - service: 三层读取协调（记录字段 -> 本地缓存 -> 计算）

mod keys;
mod local_cache;
mod service;

pub use keys::{cache_key, image_cache_id, strip_data_url_header, CacheKind, DEFAULT_NAMESPACE};
pub use local_cache::{
    CacheEntry, EvictionPolicy, LocalAiCache, LocalCacheConfig, LocalCacheStats, WriteOutcome,
    DEFAULT_EVICT_BATCH, DEFAULT_TTL_MS, MAX_TTL_MS,
};
pub use service::{AiCacheService, AiCacheServiceConfig};
