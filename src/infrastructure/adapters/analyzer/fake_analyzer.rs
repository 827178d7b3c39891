//! Fake Analyzer - 离线使用的分析端
//!
//! 不调用任何外部服务，按输入返回确定性的结果

use async_trait::async_trait;

use crate::application::ports::{AnalyzerError, AnalyzerPort};
use crate::domain::generate_insight;
use crate::domain::wallpaper::{ColorSwatch, ImageAnalysis, LensResult};

/// Fake Analyzer 配置
#[derive(Debug, Clone)]
pub struct FakeAnalyzerConfig {
    /// 模拟的计算延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeAnalyzerConfig {
    fn default() -> Self {
        Self { latency_ms: 200 }
    }
}

/// Fake Analyzer
pub struct FakeAnalyzer {
    config: FakeAnalyzerConfig,
}

impl FakeAnalyzer {
    pub fn new(config: FakeAnalyzerConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeAnalyzer initialized");
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeAnalyzerConfig::default())
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn palette() -> Vec<ColorSwatch> {
        vec![
            ColorSwatch::new("Midnight Blue", "#191970"),
            ColorSwatch::new("Electric Violet", "#8f00ff"),
            ColorSwatch::new("Soft Peach", "#f8c8a8"),
        ]
    }
}

/// 取 URL 最后一段去掉扩展名，作为图片的可读名称
fn subject_of(image_url: &str) -> String {
    let path = image_url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("image");
    let stem = segment.split('.').next().unwrap_or(segment);
    stem.replace(['-', '_'], " ")
}

#[async_trait]
impl AnalyzerPort for FakeAnalyzer {
    async fn wallpaper_insight(&self, title: &str, tags: &[String]) -> Result<String, AnalyzerError> {
        self.simulate_latency().await;
        Ok(generate_insight(title, tags))
    }

    async fn describe_for_lens(&self, image_url: &str) -> Result<LensResult, AnalyzerError> {
        if image_url.trim().is_empty() {
            return Err(AnalyzerError::InvalidInput("image_url is empty".into()));
        }
        self.simulate_latency().await;

        let subject = subject_of(image_url);
        tracing::debug!(subject = %subject, "FakeAnalyzer: returning canned lens result");

        Ok(LensResult {
            description: format!("A detailed digital scene featuring {}.", subject),
            colors: Self::palette(),
            objects: subject.split_whitespace().map(str::to_string).collect(),
            style: "Digital Art".to_string(),
            search_terms: vec![subject.clone(), format!("{} wallpaper", subject)],
        })
    }

    async fn analyze_image(&self, image_data: &str) -> Result<ImageAnalysis, AnalyzerError> {
        if image_data.trim().is_empty() {
            return Err(AnalyzerError::InvalidInput("image is empty".into()));
        }
        self.simulate_latency().await;

        Ok(ImageAnalysis {
            suggested_title: "Untitled Dreamscape".to_string(),
            description: "An atmospheric composition with rich color.".to_string(),
            tags: vec!["abstract".to_string(), "colorful".to_string()],
            category: "Abstract".to_string(),
            colors: Self::palette(),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
