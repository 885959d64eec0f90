use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::registry::RegistryError;
use crate::utils::{X_RATE_LIMIT_LIMIT, X_RATE_LIMIT_REMAINING, X_RATE_LIMIT_RESET};

/// 对外错误分类，统一渲染成 JSON 错误响应
///
/// 上游的原始错误细节只进日志，不回给调用方。
#[derive(Debug)]
pub enum AppError {
    /// 请求参数缺失或非法
    InvalidRequest(String),
    /// 本地配额耗尽
    QuotaExceeded {
        limit: u32,
        window_secs: u64,
        reset_at_ms: i64,
        retry_after_secs: u64,
    },
    NotFound(String),
    Unauthorized(String),
    /// 上游自身被限流，区别于本地配额
    UpstreamRateLimited(String),
    Upstream(String),
    /// 凭证缺失等部署问题
    Configuration(String),
}

impl AppError {
    /// 上游错误映射为对外错误；404 与兜底 500 的文案因操作不同而不同
    pub fn registry(err: RegistryError, not_found_message: &str, failure_message: &str) -> Self {
        match err {
            RegistryError::MissingApiKey => AppError::Configuration(
                "API key not configured. Please set COMPANIES_HOUSE_API_KEY environment variable."
                    .to_string(),
            ),
            RegistryError::NotFound | RegistryError::MissingDocumentLink => {
                AppError::NotFound(not_found_message.to_string())
            }
            RegistryError::Unauthorized => AppError::Unauthorized(
                "Authentication failed. Please check your API key.".to_string(),
            ),
            RegistryError::RateLimited => AppError::UpstreamRateLimited(
                "Rate limit exceeded. Please try again later.".to_string(),
            ),
            RegistryError::Upstream(detail) => {
                tracing::error!("upstream failure: {}", detail);
                AppError::Upstream(failure_message.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::QuotaExceeded {
                limit,
                window_secs,
                reset_at_ms,
                retry_after_secs,
            } => {
                return quota_exceeded_response(limit, window_secs, reset_at_ms, retry_after_secs);
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::UpstreamRateLimited(message) => (StatusCode::TOO_MANY_REQUESTS, message),
            AppError::Upstream(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::Configuration(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

fn quota_exceeded_response(
    limit: u32,
    window_secs: u64,
    reset_at_ms: i64,
    retry_after_secs: u64,
) -> Response {
    let window = if window_secs % 60 == 0 && window_secs >= 60 {
        format!("{} minutes", window_secs / 60)
    } else {
        format!("{} seconds", window_secs)
    };
    let body = Json(json!({
        "error": format!(
            "Rate limit exceeded. Companies House API allows {} requests per {}.",
            limit, window
        ),
        "retryAfter": format!("{} seconds", retry_after_secs),
    }));

    let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
    headers.insert(X_RATE_LIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from(0u32));
    headers.insert(X_RATE_LIMIT_RESET, HeaderValue::from(reset_at_ms));
    response
}
