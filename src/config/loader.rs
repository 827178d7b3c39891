//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, CacheBackend};
use crate::application::cache::MAX_TTL_MS;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AURA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AURA_SERVER__PORT=8080`
/// - `AURA_CACHE__BACKEND=memory`
/// - `AURA_CACHE__EVICTION=oldest_written`
/// - `AURA_ANALYZER__URL=http://vision:8000`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 配置文件（如果存在），缺省字段由 serde default 补齐
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 2. 环境变量（最高优先级）
    // 例如: AURA_CACHE__TTL_MS=3600000
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("AURA")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("records.external_prefixes")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.cache.namespace.is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache namespace cannot be empty".to_string(),
        ));
    }

    if config.cache.ttl_ms <= 0 {
        return Err(ConfigError::ValidationError(
            "Cache TTL must be positive".to_string(),
        ));
    }

    if config.cache.ttl_ms > MAX_TTL_MS {
        return Err(ConfigError::ValidationError(format!(
            "Cache TTL cannot exceed {}ms",
            MAX_TTL_MS
        )));
    }

    if config.cache.evict_batch == 0 {
        return Err(ConfigError::ValidationError(
            "Cache evict batch cannot be 0".to_string(),
        ));
    }

    if config.cache.backend == CacheBackend::Sled && config.cache.db_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache db path cannot be empty for the sled backend".to_string(),
        ));
    }

    if config.analyzer.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Analyzer URL cannot be empty".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.records.persist_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "Persist concurrency cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("CORS Origins: {:?}", config.server.cors_origins);
    tracing::info!("Cache Backend: {:?}", config.cache.backend);
    if config.cache.backend == CacheBackend::Sled {
        tracing::info!("Cache DB: {}", config.cache.db_path);
    }
    tracing::info!("Cache Namespace: {}", config.cache.namespace);
    tracing::info!("Cache TTL: {}ms", config.cache.ttl_ms);
    tracing::info!("Cache Quota: {} bytes", config.cache.quota_bytes);
    tracing::info!(
        "Cache Eviction: {:?} (batch {})",
        config.cache.eviction,
        config.cache.evict_batch
    );
    tracing::info!("Analyzer: {:?} ({})", config.analyzer.provider, config.analyzer.url);
    tracing::info!("Analyzer Timeout: {}s", config.analyzer.timeout_secs);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("External Prefixes: {:?}", config.records.external_prefixes);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
