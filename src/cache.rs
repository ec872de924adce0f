use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const INSIGHTS_TTL: Duration = Duration::from_secs(5 * 60);
pub const GUIDANCE_TTL: Duration = Duration::from_secs(30 * 60);
pub const MINDSET_CHECK_TTL: Duration = Duration::from_secs(60 * 60);
pub const DNA_TTL: Duration = Duration::from_secs(60 * 60);

/// Timestamp-gated map. Entries older than the TTL read as missing.
///
/// Owned by whoever composes the client; never a process-wide static.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((stored_at, value)) if now.saturating_duration_since(*stored_at) < self.ttl => {
                Some(value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        self.lock().insert(key, (now, value));
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Return the cached value, or run `fetch` and cache its success.
    ///
    /// Errors are not cached. Concurrent misses may both fetch; last write wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(300));
        let start = Instant::now();
        cache.insert_at("30d", vec![1, 2, 3], start);

        assert_eq!(cache.get_at(&"30d", start + Duration::from_secs(299)), Some(vec![1, 2, 3]));
        assert_eq!(cache.get_at(&"30d", start + Duration::from_secs(300)), None);
        // Expired entries are evicted on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);

        assert!(cache.invalidate(&"a"));
        assert!(!cache.invalidate(&"a"));
        assert_eq!(cache.get(&"b"), Some(2));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_get_or_try_insert_with_fetches_once() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0;

        let first: Result<u32, String> = cache
            .get_or_try_insert_with("dna", || {
                calls += 1;
                async { Ok(7) }
            })
            .await;
        assert_eq!(first, Ok(7));

        let second: Result<u32, String> = cache
            .get_or_try_insert_with("dna", || {
                calls += 1;
                async { Ok(8) }
            })
            .await;
        assert_eq!(second, Ok(7));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));

        let failed: Result<u32, String> = cache
            .get_or_try_insert_with("guidance", || async { Err("Network error".to_string()) })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());
    }
}
