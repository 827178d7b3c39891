//! Data Transfer Objects

use serde::{Deserialize, Serialize};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }

    /// 失败响应，`data` 为 null
    pub fn failure(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

// ============================================================================
// AI DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

/// 上传前图片分析请求
#[derive(Debug, Deserialize)]
pub struct AnalyzeImageRequest {
    /// data URL 或裸 base64
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub removed: usize,
}

// ============================================================================
// Wallpaper DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWallpaperRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GetWallpaperRequest {
    pub id: String,
}
