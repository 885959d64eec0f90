// 限流模块
// 按客户端标识在固定窗口内计数，保护上游配额

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use dashmap::DashMap;

/// 限流计数条目，窗口到期后视为不存在
#[derive(Debug, Clone)]
struct QuotaEntry {
    count: u32,
    reset_at_ms: i64,
}

/// 单次请求的限流判定与配额元数据
#[derive(Debug, Clone, Copy)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at_ms: i64,
    /// 拒绝时距窗口重置的秒数（向上取整），通过时为 0
    pub retry_after_secs: u64,
}

/// 固定窗口限流器
///
/// 窗口过期在读取时重新计算，不依赖后台清理任务；
/// DashMap 的 entry 接口保证同一客户端的检查与计数是原子的。
pub struct QuotaTracker {
    entries: DashMap<String, QuotaEntry>,
    limit: u32,
    window: Duration,
}

impl QuotaTracker {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
        }
    }

    /// 检查并记录一次请求
    pub fn admit(&self, client_key: &str) -> QuotaDecision {
        let now = chrono::Utc::now().timestamp_millis();
        let window_ms = self.window.as_millis() as i64;

        let mut entry = self
            .entries
            .entry(client_key.to_string())
            .or_insert_with(|| QuotaEntry {
                count: 0,
                reset_at_ms: now + window_ms,
            });

        if entry.reset_at_ms <= now {
            // 窗口已过，重新开始计数
            entry.count = 0;
            entry.reset_at_ms = now + window_ms;
        }

        if entry.count >= self.limit {
            let retry_after_secs = ((entry.reset_at_ms - now + 999) / 1000).max(1) as u64;
            return QuotaDecision {
                allowed: false,
                limit: self.limit,
                remaining: 0,
                reset_at_ms: entry.reset_at_ms,
                retry_after_secs,
            };
        }

        entry.count += 1;
        QuotaDecision {
            allowed: true,
            limit: self.limit,
            remaining: self.limit - entry.count,
            reset_at_ms: entry.reset_at_ms,
            retry_after_secs: 0,
        }
    }

    /// 删除窗口已过的条目，返回删除数量
    pub fn purge_expired(&self) -> usize {
        let now = chrono::Utc::now().timestamp_millis();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.reset_at_ms > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 连接对端地址，服务未挂 ConnectInfo 时（比如测试里直接调用 Router）为 None
#[derive(Debug, Clone, Copy)]
pub struct ClientAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientAddr(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

/// 从请求头或连接信息推导客户端标识
///
/// 优先 x-real-ip，其次 x-forwarded-for 的第一个非空段，再退到对端地址；
/// 都拿不到时归入 "unknown"，所有无法归属的请求共享同一配额桶。
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|list| list.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .map(|ip| ip.trim().to_string())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
