//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    AiCacheService, AnalyzeUploadHandler, GetInsightHandler, GetLensAnalysisHandler,
    GetWallpaperHandler, SaveWallpaperHandler, WallpaperRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Services ==========
    pub cache_service: Arc<AiCacheService>,

    // ========== Command Handlers ==========
    pub save_wallpaper_handler: SaveWallpaperHandler,

    // ========== Query Handlers ==========
    pub get_wallpaper_handler: GetWallpaperHandler,
    pub get_insight_handler: GetInsightHandler,
    pub get_lens_handler: GetLensAnalysisHandler,
    pub analyze_upload_handler: AnalyzeUploadHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        cache_service: Arc<AiCacheService>,
        wallpaper_repo: Arc<dyn WallpaperRepositoryPort>,
    ) -> Self {
        Self {
            cache_service: cache_service.clone(),

            // Command handlers
            save_wallpaper_handler: SaveWallpaperHandler::new(wallpaper_repo.clone()),

            // Query handlers
            get_wallpaper_handler: GetWallpaperHandler::new(wallpaper_repo),
            get_insight_handler: GetInsightHandler::new(cache_service.clone()),
            get_lens_handler: GetLensAnalysisHandler::new(cache_service.clone()),
            analyze_upload_handler: AnalyzeUploadHandler::new(cache_service),
        }
    }
}
