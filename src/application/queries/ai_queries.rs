//! AI Queries
//!
//! 读取（必要时计算）壁纸的 AI 标注

use crate::domain::wallpaper::Wallpaper;

/// 获取 insight 查询
#[derive(Debug, Clone)]
pub struct GetInsight {
    pub wallpaper: Wallpaper,
}

/// 获取 Lens 分析查询
#[derive(Debug, Clone)]
pub struct GetLensAnalysis {
    pub wallpaper: Wallpaper,
}

/// 上传前的图片分析查询
#[derive(Debug, Clone)]
pub struct AnalyzeUpload {
    /// data URL 或裸 base64
    pub image: String,
}
