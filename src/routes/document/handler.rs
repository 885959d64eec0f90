use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::AppState;
use crate::error::AppError;
use crate::quota::ClientAddr;
use crate::registry::RegistryError;
use crate::utils::{check_quota, document_response};

use super::model::DocumentQuery;

#[axum::debug_handler]
pub async fn get_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let url = query.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(AppError::InvalidRequest(
            "Document URL is required".to_string(),
        ));
    }

    let decision = check_quota(&state, &headers, peer)?;

    // 文书内容是二进制且一次性下载，不进响应缓存
    let content = state.registry.document(url).await.map_err(|err| match err {
        RegistryError::MissingDocumentLink => {
            AppError::NotFound("Document content URL not found".to_string())
        }
        other => AppError::registry(other, "Document not found", "Failed to fetch document"),
    })?;

    Ok(document_response(content, &decision))
}
