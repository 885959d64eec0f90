use std::net::{IpAddr, SocketAddr};

use companies_backend::{AppState, build_router, config::Config, middleware::log_errors};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env();

    if config.companies_house_api_key.is_none() {
        tracing::warn!(
            "COMPANIES_HOUSE_API_KEY is not set; upstream calls will fail with a configuration error"
        );
    }

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置应用状态
    let state = AppState::new(config.clone()).expect("Failed to build HTTP client");

    // 后台定期清理过期的缓存与限流条目；正确性不依赖它，纯粹回收内存
    let sweeper = {
        let cache = state.cache.clone();
        let quota = state.quota.clone();
        let period = config.sweep_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval 的第一次 tick 立即完成，跳过
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let cache_removed = cache.purge_expired();
                let quota_removed = quota.purge_expired();
                tracing::debug!(
                    "sweep removed {} cache entries, {} quota entries",
                    cache_removed,
                    quota_removed
                );
            }
        })
    };

    // 添加日志中间件
    let router = build_router(state).layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");

    sweeper.abort();
}
