//! HTTP Middleware
//!
//! 请求耗时与 HTTP 状态码错误日志

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 请求耗时超过该值时记录慢请求（AI 计算未命中缓存时会触发）
const SLOW_REQUEST_MS: u128 = 3_000;

/// HTTP 状态码错误日志中间件
///
/// 状态码为 4xx / 5xx 时记录日志，慢请求记录 info。
/// 业务错误（errno != 0）的 HTTP 状态是 200，由 ApiError::into_response() 记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    } else if elapsed_ms >= SLOW_REQUEST_MS {
        tracing::info!(method = %method, uri = %uri, elapsed_ms = elapsed_ms, "Slow request");
    }

    response
}
