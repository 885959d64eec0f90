use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod quota;
pub mod registry;
pub mod routes;
pub mod utils;

use cache::ResponseCache;
use config::Config;
use quota::QuotaTracker;
use registry::RegistryClient;

/// 全局共享状态
///
/// 进程启动时构建一次，按引用注入各 handler；
/// 缓存与限流都只存在内存里，进程重启即清空。
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<RegistryClient>,
    pub cache: Arc<ResponseCache>,
    pub quota: Arc<QuotaTracker>,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let registry = Arc::new(RegistryClient::new(&config)?);
        let quota = Arc::new(QuotaTracker::new(
            config.rate_limit_requests,
            config.rate_limit_window(),
        ));
        Ok(Self {
            config,
            registry,
            cache: Arc::new(ResponseCache::new()),
            quota,
        })
    }
}

/// 五个代理接口的路由表
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/companies/search", get(routes::search::search_companies))
        .route("/companies/document", get(routes::document::get_document))
        .route("/companies/{company_number}", get(routes::company::get_profile))
        .route(
            "/companies/{company_number}/filing-history",
            get(routes::company::get_filing_history),
        )
        .route(
            "/company/{company_number}/officers",
            get(routes::company::get_officers),
        )
        .with_state(state)
}
