//! HTTP Error Handling
//!
//! 前端只看 `errno`：HTTP 状态始终是 200，失败时 `data` 为 null

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::ApiResponse;
use crate::application::ApplicationError;

/// API 错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求体无法解析，或内容无法计算（空图片、缺少 imageUrl）
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// 视觉服务不可用或返回错误，前端可以稍后重试
    #[error("{0}")]
    ComputeUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => 500,
            ApiError::ComputeUnavailable(_) => 503,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let message = self.to_string();

        if errno >= 500 {
            tracing::error!(errno = errno, error = %message, "Request failed");
        } else {
            tracing::warn!(errno = errno, error = %message, "Request rejected");
        }

        let body: ApiResponse<()> = ApiResponse::failure(errno, message);
        (StatusCode::OK, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ComputeUnavailable(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
