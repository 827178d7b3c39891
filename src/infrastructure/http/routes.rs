//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/ai/insight        POST  获取壁纸 insight（请求体为壁纸记录）
//! - /api/ai/lens           POST  获取壁纸 Lens 分析（请求体为壁纸记录）
//! - /api/ai/analysis       POST  分析上传中的图片
//! - /api/ai/cache/clear    POST  清空本地 AI 缓存
//! - /api/ai/cache/stats    GET   本地 AI 缓存统计
//! - /api/wallpaper/save    POST  保存壁纸记录
//! - /api/wallpaper/get     POST  获取壁纸记录

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/ai", ai_routes())
        .nest("/wallpaper", wallpaper_routes())
}

/// AI 路由
fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insight", post(handlers::get_insight))
        .route("/lens", post(handlers::get_lens_analysis))
        .route("/analysis", post(handlers::analyze_image))
        .route("/cache/clear", post(handlers::clear_cache))
        .route("/cache/stats", get(handlers::cache_stats))
}

/// Wallpaper 路由
fn wallpaper_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save", post(handlers::save_wallpaper))
        .route("/get", post(handlers::get_wallpaper))
}
