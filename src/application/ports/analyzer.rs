//! Analyzer Port - AI 计算端
//!
//! insight / lens / 上传分析三类计算。调用代价高（网络、限流、计费），
//! 由缓存服务负责尽量少调用

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::wallpaper::{ImageAnalysis, LensResult};

/// 分析错误
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Analyzer Port
///
/// 实现必须可并发调用；相同输入的重复调用结果可互换
#[async_trait]
pub trait AnalyzerPort: Send + Sync {
    /// 根据标题和标签生成 insight 文本
    async fn wallpaper_insight(&self, title: &str, tags: &[String]) -> Result<String, AnalyzerError>;

    /// 根据图片 URL 生成 Lens 分析
    async fn describe_for_lens(&self, image_url: &str) -> Result<LensResult, AnalyzerError>;

    /// 分析上传中的图片（data URL 或裸 base64）
    async fn analyze_image(&self, image_data: &str) -> Result<ImageAnalysis, AnalyzerError>;

    /// 检查分析服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
