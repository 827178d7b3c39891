//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::cache::{
    EvictionPolicy, DEFAULT_EVICT_BATCH, DEFAULT_NAMESPACE, DEFAULT_TTL_MS,
};
use crate::domain::wallpaper::DEFAULT_EXTERNAL_PREFIXES;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 本地 AI 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// AI 计算端配置
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 持久化记录写回配置
    #[serde(default)]
    pub records: RecordsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,

    /// 允许跨域访问的前端来源，为空表示不限制
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

fn default_body_limit() -> usize {
    20 * 1024 * 1024 // 20 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 本地存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// 进程重启后保留
    #[default]
    Sled,
    /// 仅进程内
    Memory,
}

/// 本地 AI 缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// sled 数据库路径
    #[serde(default = "default_cache_db_path")]
    pub db_path: String,

    /// key 前缀
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// 条目有效期（毫秒）
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: i64,

    /// 容量上限（字节），0 表示不限制
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,

    /// 写入失败时一次淘汰的条目数
    #[serde(default = "default_evict_batch")]
    pub evict_batch: usize,

    /// 淘汰顺序
    #[serde(default)]
    pub eviction: EvictionPolicy,
}

fn default_cache_db_path() -> String {
    "data/ai_cache.sled".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_ttl_ms() -> i64 {
    DEFAULT_TTL_MS
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024 // 5 MB
}

fn default_evict_batch() -> usize {
    DEFAULT_EVICT_BATCH
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            db_path: default_cache_db_path(),
            namespace: default_namespace(),
            ttl_ms: default_ttl_ms(),
            quota_bytes: default_quota_bytes(),
            evict_batch: default_evict_batch(),
            eviction: EvictionPolicy::default(),
        }
    }
}

/// AI 计算端实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerProvider {
    /// 外部视觉服务
    #[default]
    Http,
    /// 离线固定结果
    Fake,
}

/// AI 计算端配置
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub provider: AnalyzerProvider,

    /// 视觉服务基础 URL
    #[serde(default = "default_analyzer_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_analyzer_timeout")]
    pub timeout_secs: u64,
}

fn default_analyzer_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_analyzer_timeout() -> u64 {
    60
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: AnalyzerProvider::default(),
            url: default_analyzer_url(),
            timeout_secs: default_analyzer_timeout(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/aura.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 持久化记录写回配置
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    /// 外部来源内容的 ID 前缀，不写回
    #[serde(default = "default_external_prefixes")]
    pub external_prefixes: Vec<String>,

    /// 后台写回的最大并发数
    #[serde(default = "default_persist_concurrency")]
    pub persist_concurrency: usize,
}

fn default_external_prefixes() -> Vec<String> {
    DEFAULT_EXTERNAL_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_persist_concurrency() -> usize {
    4
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            external_prefixes: default_external_prefixes(),
            persist_concurrency: default_persist_concurrency(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
