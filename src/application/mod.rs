//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Analyzer、LocalStore、Repository、PersistQueue、Clock）
//! - cache: 多层 AI 结果缓存
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod cache;
pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use cache::{
    AiCacheService, AiCacheServiceConfig, CacheKind, EvictionPolicy, LocalAiCache,
    LocalCacheConfig, LocalCacheStats,
};

pub use commands::{handlers::SaveWallpaperHandler, SaveWallpaper};

pub use error::ApplicationError;

pub use ports::{
    AnalyzerError, AnalyzerPort, Clock, LocalStoreError, LocalStorePort, PersistJob,
    PersistQueuePort, RepositoryError, SystemClock, WallpaperRepositoryPort,
};

pub use queries::{
    handlers::{AnalyzeUploadHandler, GetInsightHandler, GetLensAnalysisHandler, GetWallpaperHandler},
    AnalyzeUpload, GetInsight, GetLensAnalysis, GetWallpaper,
};
