use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use crate::AppState;
use crate::cache::{COMPANY_CACHE_TTL, FILING_CACHE_TTL, OFFICERS_CACHE_TTL, keys};
use crate::error::AppError;
use crate::quota::ClientAddr;
use crate::utils::{CacheStatus, check_quota, proxied_json};

use super::model::FilingHistoryQuery;

const DEFAULT_FILING_ITEMS_PER_PAGE: u32 = 25;

// 高管列表不向调用方开放分页，固定取上游允许的最大一页
const OFFICERS_ITEMS_PER_PAGE: u32 = 100;
const OFFICERS_START_INDEX: u32 = 0;

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(company_number): Path<String>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let decision = check_quota(&state, &headers, peer)?;

    let cache_key = keys::company_cache_key(&company_number);
    if let Some(payload) = state.cache.get(&cache_key) {
        return Ok(proxied_json(
            payload,
            CacheStatus::Hit,
            COMPANY_CACHE_TTL,
            &decision,
        ));
    }

    let payload = state
        .registry
        .company_profile(&company_number)
        .await
        .map_err(|err| {
            AppError::registry(err, "Company not found", "Failed to fetch company profile")
        })?;

    state
        .cache
        .set(&cache_key, payload.clone(), COMPANY_CACHE_TTL);
    Ok(proxied_json(
        payload,
        CacheStatus::Miss,
        COMPANY_CACHE_TTL,
        &decision,
    ))
}

#[axum::debug_handler]
pub async fn get_filing_history(
    State(state): State<AppState>,
    Path(company_number): Path<String>,
    Query(query): Query<FilingHistoryQuery>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let items_per_page = query.items_per_page.unwrap_or(DEFAULT_FILING_ITEMS_PER_PAGE);
    let start_index = query.start_index.unwrap_or(0);

    let decision = check_quota(&state, &headers, peer)?;

    let cache_key = keys::filing_history_cache_key(&company_number, items_per_page, start_index);
    if let Some(payload) = state.cache.get(&cache_key) {
        return Ok(proxied_json(
            payload,
            CacheStatus::Hit,
            FILING_CACHE_TTL,
            &decision,
        ));
    }

    let payload = state
        .registry
        .filing_history(&company_number, items_per_page, start_index)
        .await
        .map_err(|err| {
            AppError::registry(err, "Company not found", "Failed to fetch filing history")
        })?;

    state
        .cache
        .set(&cache_key, payload.clone(), FILING_CACHE_TTL);
    Ok(proxied_json(
        payload,
        CacheStatus::Miss,
        FILING_CACHE_TTL,
        &decision,
    ))
}

#[axum::debug_handler]
pub async fn get_officers(
    State(state): State<AppState>,
    Path(company_number): Path<String>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let decision = check_quota(&state, &headers, peer)?;

    let cache_key = keys::officers_cache_key(
        &company_number,
        OFFICERS_ITEMS_PER_PAGE,
        OFFICERS_START_INDEX,
    );
    if let Some(payload) = state.cache.get(&cache_key) {
        return Ok(proxied_json(
            payload,
            CacheStatus::Hit,
            OFFICERS_CACHE_TTL,
            &decision,
        ));
    }

    let payload = state
        .registry
        .officers(&company_number, OFFICERS_ITEMS_PER_PAGE, OFFICERS_START_INDEX)
        .await
        .map_err(|err| AppError::registry(err, "Company not found", "Failed to fetch officers"))?;

    state
        .cache
        .set(&cache_key, payload.clone(), OFFICERS_CACHE_TTL);
    Ok(proxied_json(
        payload,
        CacheStatus::Miss,
        OFFICERS_CACHE_TTL,
        &decision,
    ))
}
