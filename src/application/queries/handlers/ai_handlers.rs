//! AI Query Handlers
//!
//! 薄封装：把查询交给 AiCacheService，缓存读写策略都在服务内部

use std::sync::Arc;

use crate::application::cache::AiCacheService;
use crate::application::error::ApplicationError;
use crate::application::queries::{AnalyzeUpload, GetInsight, GetLensAnalysis};
use crate::domain::wallpaper::{ImageAnalysis, LensResult};

/// GetInsight Handler
pub struct GetInsightHandler {
    cache: Arc<AiCacheService>,
}

impl GetInsightHandler {
    pub fn new(cache: Arc<AiCacheService>) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, query: GetInsight) -> Result<String, ApplicationError> {
        self.cache.get_insight(&query.wallpaper).await
    }
}

/// GetLensAnalysis Handler
pub struct GetLensAnalysisHandler {
    cache: Arc<AiCacheService>,
}

impl GetLensAnalysisHandler {
    pub fn new(cache: Arc<AiCacheService>) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, query: GetLensAnalysis) -> Result<LensResult, ApplicationError> {
        self.cache.get_lens_analysis(&query.wallpaper).await
    }
}

/// AnalyzeUpload Handler
pub struct AnalyzeUploadHandler {
    cache: Arc<AiCacheService>,
}

impl AnalyzeUploadHandler {
    pub fn new(cache: Arc<AiCacheService>) -> Self {
        Self { cache }
    }

    pub async fn handle(&self, query: AnalyzeUpload) -> Result<ImageAnalysis, ApplicationError> {
        self.cache.get_image_analysis(&query.image).await
    }
}
