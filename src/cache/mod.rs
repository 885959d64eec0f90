// 缓存模块
// 包含响应缓存存储与缓存键生成逻辑

use std::time::Duration;

pub mod keys;
pub mod store;

pub use store::ResponseCache;

/// 搜索结果缓存过期时间
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// 公司信息缓存过期时间
pub const COMPANY_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// 申报历史缓存过期时间
pub const FILING_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// 高管列表缓存过期时间
pub const OFFICERS_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
