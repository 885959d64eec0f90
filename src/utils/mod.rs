use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::AppState;
use crate::error::AppError;
use crate::quota::{self, QuotaDecision};
use crate::registry::DocumentContent;

pub const X_CACHE: &str = "x-cache";
pub const X_RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// 响应是否命中缓存
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// 提取客户端标识并做配额判定，超限时直接转成 429 错误
pub fn check_quota(
    state: &AppState,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> Result<QuotaDecision, AppError> {
    let key = quota::client_key(headers, peer);
    let decision = state.quota.admit(&key);
    if decision.allowed {
        Ok(decision)
    } else {
        tracing::warn!("quota exhausted for client {}", key);
        Err(AppError::QuotaExceeded {
            limit: decision.limit,
            window_secs: state.config.rate_limit_window_secs,
            reset_at_ms: decision.reset_at_ms,
            retry_after_secs: decision.retry_after_secs,
        })
    }
}

/// 限流判定写入响应头
pub fn rate_limit_headers(headers: &mut HeaderMap, decision: &QuotaDecision) {
    headers.insert(X_RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(X_RATE_LIMIT_RESET, HeaderValue::from(decision.reset_at_ms));
}

/// 组装 JSON 代理响应，带缓存与限流元数据
pub fn proxied_json(
    payload: Value,
    cache_status: CacheStatus,
    ttl: Duration,
    decision: &QuotaDecision,
) -> Response {
    let mut response = Json(payload).into_response();
    let headers = response.headers_mut();
    headers.insert(X_CACHE, HeaderValue::from_static(cache_status.as_str()));
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    rate_limit_headers(headers, decision);
    response
}

/// 组装文书下载响应，内容类型以上游声明为准
pub fn document_response(content: DocumentContent, decision: &QuotaDecision) -> Response {
    let DocumentContent {
        content_type,
        bytes,
    } = content;
    let content_type_value = HeaderValue::from_str(&content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/pdf"));

    let mut response = bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type_value);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline; filename=\"company-document.pdf\""),
    );
    rate_limit_headers(headers, decision);
    response
}
