use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

/// 缓存条目，带绝对过期时间
struct CacheEntry {
    payload: Value,
    expires_at: Instant,
}

/// 进程内响应缓存
///
/// 过期条目在读取时删除，后台清理只是回收内存的优化，
/// 即使从不运行也不影响正确性。
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// 读取未过期的条目，过期条目顺手删除
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.payload.clone());
            }
            drop(entry);
            self.entries.remove(key);
        }
        None
    }

    /// 写入条目，同键条目无条件覆盖
    pub fn set(&self, key: &str, payload: Value, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 删除已过期的条目，返回删除数量
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn returns_stored_payload_before_expiry() {
        let cache = ResponseCache::new();
        cache.set("company:123", json!({"name": "ACME"}), Duration::from_secs(60));
        assert_eq!(cache.get("company:123"), Some(json!({"name": "ACME"})));
    }

    #[test]
    fn absent_key_is_none() {
        let cache = ResponseCache::new();
        assert_eq!(cache.get("company:123"), None);
    }

    #[test]
    fn expired_entry_is_absent_and_lazily_deleted() {
        let cache = ResponseCache::new();
        cache.set("company:123", json!(1), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("company:123"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let cache = ResponseCache::new();
        cache.set("k", json!("old"), Duration::from_secs(60));
        cache.set("k", json!("new"), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!("new")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let cache = ResponseCache::new();
        cache.set("stale", json!(1), Duration::from_millis(10));
        cache.set("fresh", json!(2), Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("fresh"), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_store() {
        let cache = ResponseCache::new();
        cache.set("a", json!(1), Duration::from_secs(60));
        cache.set("b", json!(2), Duration::from_secs(60));
        cache.clear();
        assert!(cache.is_empty());
    }
}
