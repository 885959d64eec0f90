use std::env;
use std::time::Duration;

const DEFAULT_REGISTRY_API_URL: &str = "https://api.company-information.service.gov.uk";

#[derive(Debug, Clone)]
pub struct Config {
    pub companies_house_api_key: Option<String>,
    pub registry_api_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub upstream_timeout_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Config {
    /// 环境变量：
    /// - COMPANIES_HOUSE_API_KEY（未设置时每个上游请求返回配置错误）
    /// - COMPANIES_HOUSE_API_URL（默认官方地址）
    /// - SERVER_HOST / SERVER_PORT（默认 "::" / 3000）
    /// - RATE_LIMIT_WINDOW / RATE_LIMIT_REQUESTS（默认 300 秒内 600 次）
    /// - UPSTREAM_TIMEOUT_SECS（默认 30）
    /// - SWEEP_INTERVAL_SECS（默认 60）
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            companies_house_api_key: env::var("COMPANIES_HOUSE_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            registry_api_url: env::var("COMPANIES_HOUSE_API_URL")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_API_URL.to_string()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(300),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(600),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(30),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(60),
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
