//! Aura - 壁纸 AI 标注服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Wallpaper Context: 壁纸记录、Lens 分析、上传分析结果
//! - Insight 生成器
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Analyzer, LocalStore, WallpaperRepository, PersistQueue, Clock）
//! - Cache: 多层 AI 结果缓存（记录字段 -> 本地 TTL 缓存 -> 计算）
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: 进程内本地存储
//! - Worker: 标注写回 Worker
//! - Persistence: SQLite + Sled 存储
//! - Adapters: 视觉服务客户端、离线 Analyzer

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
