//! AI HTTP Handlers
//!
//! insight / Lens 请求体是完整的壁纸记录：已物化的标注字段决定是否需要计算

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::{AnalyzeUpload, GetInsight, GetLensAnalysis, LocalCacheStats};
use crate::domain::wallpaper::{ImageAnalysis, LensResult, Wallpaper};
use crate::infrastructure::http::dto::{
    AnalyzeImageRequest, ApiResponse, ClearCacheResponse, InsightResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取壁纸 insight
pub async fn get_insight(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Wallpaper>, JsonRejection>,
) -> Result<Json<ApiResponse<InsightResponse>>, ApiError> {
    let Json(wallpaper) = payload?;
    let insight = state
        .get_insight_handler
        .handle(GetInsight { wallpaper })
        .await?;

    Ok(Json(ApiResponse::success(InsightResponse { insight })))
}

/// 获取壁纸 Lens 分析
pub async fn get_lens_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Wallpaper>, JsonRejection>,
) -> Result<Json<ApiResponse<LensResult>>, ApiError> {
    let Json(wallpaper) = payload?;
    let lens = state
        .get_lens_handler
        .handle(GetLensAnalysis { wallpaper })
        .await?;

    Ok(Json(ApiResponse::success(lens)))
}

/// 分析上传中的图片
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeImageRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ImageAnalysis>>, ApiError> {
    let Json(req) = payload?;
    let analysis = state
        .analyze_upload_handler
        .handle(AnalyzeUpload { image: req.image })
        .await?;

    Ok(Json(ApiResponse::success(analysis)))
}

/// 清空本地 AI 缓存
pub async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<ClearCacheResponse>> {
    let removed = state.cache_service.local_cache().clear();
    Json(ApiResponse::success(ClearCacheResponse { removed }))
}

/// 本地 AI 缓存统计
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LocalCacheStats>> {
    Json(ApiResponse::success(state.cache_service.local_cache().stats()))
}
