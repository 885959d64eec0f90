use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// 把 5xx 响应体连同请求方法和路径写入日志，再原样返回
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        let (mut parts, body) = response.into_parts();
        let bytes = match to_bytes(body, 4096).await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("Failed to read error response body: {}", err);
                return Response::from_parts(parts, Body::empty());
            }
        };

        error!(
            "Server error - {} {} responded {}, body: {}",
            method,
            path,
            parts.status,
            String::from_utf8_lossy(&bytes)
        );

        // 重新构建响应前去掉长度头，避免与截断后的 body 不一致
        parts.headers.remove(axum::http::header::CONTENT_LENGTH);
        Response::from_parts(parts, Body::from(bytes))
    } else {
        response
    }
}
