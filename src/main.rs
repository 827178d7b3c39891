//! Aura - 壁纸 AI 标注服务
//!
//! - Domain: wallpaper/, insight
//! - Application: cache, commands, queries, ports
//! - Infrastructure: http, memory, worker, persistence, adapters

use std::sync::Arc;

use aura::application::{
    AiCacheService, AiCacheServiceConfig, AnalyzerPort, LocalAiCache, LocalCacheConfig,
    LocalStorePort, SystemClock,
};
use aura::config::{load_config, print_config, AnalyzerProvider, CacheBackend};
use aura::infrastructure::adapters::{
    FakeAnalyzer, FakeAnalyzerConfig, HttpAnalyzerClient, HttpAnalyzerClientConfig,
};
use aura::infrastructure::http::{shutdown_signal, AppState, HttpServer, ServerConfig};
use aura::infrastructure::memory::InMemoryLocalStore;
use aura::infrastructure::persistence::sled::{SledLocalStore, SledStoreConfig};
use aura::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteWallpaperRepository,
};
use aura::infrastructure::worker::{ChannelPersistQueue, PersistWorker, PersistWorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},aura={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Aura - 壁纸 AI 标注服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig::file(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;
    let wallpaper_repo = Arc::new(SqliteWallpaperRepository::new(pool));

    // 创建本地存储
    let local_store: Arc<dyn LocalStorePort> = match config.cache.backend {
        CacheBackend::Sled => {
            let store_config = SledStoreConfig {
                db_path: config.cache.db_path.clone(),
                quota_bytes: config.cache.quota_bytes,
            };
            Arc::new(SledLocalStore::new(&store_config)?)
        }
        CacheBackend::Memory => Arc::new(InMemoryLocalStore::new(config.cache.quota_bytes)),
    };

    // 创建 Analyzer
    let analyzer: Arc<dyn AnalyzerPort> = match config.analyzer.provider {
        AnalyzerProvider::Http => {
            let analyzer_config = HttpAnalyzerClientConfig::new(&config.analyzer.url)
                .with_timeout(config.analyzer.timeout_secs);
            Arc::new(HttpAnalyzerClient::new(analyzer_config)?)
        }
        AnalyzerProvider::Fake => Arc::new(FakeAnalyzer::new(FakeAnalyzerConfig::default())),
    };
    if !analyzer.health_check().await {
        tracing::warn!(url = %config.analyzer.url, "Analyzer health check failed, AI requests may error");
    }

    // 创建写回队列和 Worker
    let (persist_queue, persist_rx) = ChannelPersistQueue::channel();
    let worker = PersistWorker::new(
        PersistWorkerConfig {
            max_concurrent: config.records.persist_concurrency,
        },
        persist_rx,
        wallpaper_repo.clone(),
    );
    tokio::spawn(worker.run());

    // 创建 AI 缓存服务
    let local_cache = LocalAiCache::new(
        local_store,
        Arc::new(SystemClock),
        LocalCacheConfig {
            namespace: config.cache.namespace.clone(),
            ttl_ms: config.cache.ttl_ms,
            evict_batch: config.cache.evict_batch,
            eviction: config.cache.eviction,
        },
    );
    let cache_service = Arc::new(AiCacheService::new(
        local_cache,
        analyzer,
        Arc::new(persist_queue),
        AiCacheServiceConfig {
            external_prefixes: config.records.external_prefixes.clone(),
        },
    ));

    // 创建 HTTP 服务器
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        body_limit_bytes: config.server.body_limit_bytes,
        cors_origins: config.server.cors_origins.clone(),
    };
    let state = AppState::new(cache_service, wallpaper_repo);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
