//! Wallpaper HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetWallpaper, SaveWallpaper};
use crate::domain::wallpaper::Wallpaper;
use crate::infrastructure::http::dto::{ApiResponse, GetWallpaperRequest, SaveWallpaperRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 保存壁纸记录
pub async fn save_wallpaper(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveWallpaperRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Wallpaper>>, ApiError> {
    let Json(req) = payload?;
    let command = SaveWallpaper {
        id: req.id,
        title: req.title,
        tags: req.tags,
        image_url: req.image_url,
    };

    let wallpaper = state.save_wallpaper_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(wallpaper)))
}

/// 获取壁纸记录
pub async fn get_wallpaper(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GetWallpaperRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Wallpaper>>, ApiError> {
    let Json(req) = payload?;
    let wallpaper = state
        .get_wallpaper_handler
        .handle(GetWallpaper { id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(wallpaper)))
}
