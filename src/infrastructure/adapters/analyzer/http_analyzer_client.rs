//! HTTP Analyzer Client - 调用外部视觉分析服务
//!
//! 实现 AnalyzerPort trait。insight 在本地由模板生成，
//! Lens 分析和上传分析通过 HTTP 调用视觉服务
//!
//! 外部视觉 API:
//! POST {base_url}/api/vision/lens     Request: {"imageUrl": "..."}  Response: LensResult (JSON)
//! POST {base_url}/api/vision/analyze  Request: {"image": "..."}     Response: ImageAnalysis (JSON)

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{AnalyzerError, AnalyzerPort};
use crate::domain::generate_insight;
use crate::domain::wallpaper::{ImageAnalysis, LensResult};

/// Lens 请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LensHttpRequest<'a> {
    image_url: &'a str,
}

/// 上传分析请求体
#[derive(Debug, Serialize)]
struct AnalyzeHttpRequest<'a> {
    /// data URL 或裸 base64
    image: &'a str,
}

/// HTTP Analyzer 客户端配置
#[derive(Debug, Clone)]
pub struct HttpAnalyzerClientConfig {
    /// 视觉服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpAnalyzerClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl HttpAnalyzerClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Analyzer 客户端
pub struct HttpAnalyzerClient {
    client: Client,
    config: HttpAnalyzerClientConfig,
}

impl HttpAnalyzerClient {
    /// 创建新的客户端
    pub fn new(config: HttpAnalyzerClientConfig) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalyzerError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST JSON 并解析 JSON 响应
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AnalyzerError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "Sending vision request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalyzerError::Timeout
                } else if e.is_connect() {
                    AnalyzerError::NetworkError(format!("Cannot connect to vision service: {}", e))
                } else {
                    AnalyzerError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(url = %url, status = %status, error = %e, "Failed to read vision service error body");
                    String::new()
                }
            };
            return Err(AnalyzerError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AnalyzerPort for HttpAnalyzerClient {
    async fn wallpaper_insight(&self, title: &str, tags: &[String]) -> Result<String, AnalyzerError> {
        Ok(generate_insight(title, tags))
    }

    async fn describe_for_lens(&self, image_url: &str) -> Result<LensResult, AnalyzerError> {
        if image_url.trim().is_empty() {
            return Err(AnalyzerError::InvalidInput("image_url is empty".into()));
        }

        let result: LensResult = self
            .post_json("/api/vision/lens", &LensHttpRequest { image_url })
            .await?;

        tracing::info!(
            colors = result.colors.len(),
            objects = result.objects.len(),
            style = %result.style,
            "Lens analysis completed"
        );
        Ok(result)
    }

    async fn analyze_image(&self, image_data: &str) -> Result<ImageAnalysis, AnalyzerError> {
        if image_data.trim().is_empty() {
            return Err(AnalyzerError::InvalidInput("image is empty".into()));
        }

        let result: ImageAnalysis = self
            .post_json("/api/vision/analyze", &AnalyzeHttpRequest { image: image_data })
            .await?;

        tracing::info!(
            category = %result.category,
            tags = result.tags.len(),
            "Image analysis completed"
        );
        Ok(result)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/health"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
