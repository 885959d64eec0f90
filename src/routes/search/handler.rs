use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::AppState;
use crate::cache::{SEARCH_CACHE_TTL, keys};
use crate::error::AppError;
use crate::quota::ClientAddr;
use crate::registry::{AdvancedSearchCriteria, RegistryError};
use crate::utils::{CacheStatus, check_quota, proxied_json};

use super::model::SearchQuery;

const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

#[axum::debug_handler]
pub async fn search_companies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::InvalidRequest(
            "Query parameter is required".to_string(),
        ));
    }
    let search_type = query.search_type.as_deref().unwrap_or("name");
    let items_per_page = query.items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);
    let start_index = query.start_index.unwrap_or(0);

    // sic_code 查询去掉空白后再参与缓存键和上游调用
    let (normalized, criteria) = match search_type {
        "name" => (q.to_string(), None),
        "sic_code" => {
            let codes: String = q.split_whitespace().collect();
            (codes.clone(), Some(AdvancedSearchCriteria::SicCodes(codes)))
        }
        "nature_of_business" => (
            q.to_string(),
            Some(AdvancedSearchCriteria::NatureOfBusiness(q.to_string())),
        ),
        other => {
            return Err(AppError::InvalidRequest(format!(
                "search_type must be one of name, sic_code, nature_of_business; got {}",
                other
            )));
        }
    };

    let decision = check_quota(&state, &headers, peer)?;

    let cache_key = keys::search_cache_key(search_type, &normalized, items_per_page, start_index);
    if let Some(payload) = state.cache.get(&cache_key) {
        return Ok(proxied_json(
            payload,
            CacheStatus::Hit,
            SEARCH_CACHE_TTL,
            &decision,
        ));
    }

    let result = match &criteria {
        None => {
            state
                .registry
                .search_companies(&normalized, items_per_page, start_index)
                .await
        }
        Some(criteria) => {
            state
                .registry
                .advanced_search(criteria, items_per_page, start_index)
                .await
        }
    };
    let payload = result.map_err(|err| match err {
        // 搜索没有 404 语义，上游 404 按一般失败处理
        RegistryError::NotFound => {
            AppError::Upstream("Failed to search companies. Please try again.".to_string())
        }
        other => AppError::registry(
            other,
            "Failed to search companies. Please try again.",
            "Failed to search companies. Please try again.",
        ),
    })?;

    state
        .cache
        .set(&cache_key, payload.clone(), SEARCH_CACHE_TTL);
    Ok(proxied_json(
        payload,
        CacheStatus::Miss,
        SEARCH_CACHE_TTL,
        &decision,
    ))
}
