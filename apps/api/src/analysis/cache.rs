//! Memoization for key-information extraction.
//!
//! Identical resume text within the cache's residency window is answered
//! without a model call. Bounded LRU, no TTL, shared via `AppState`.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;

/// How many distinct resume texts the cache retains before evicting the
/// least recently used entry.
pub const KEY_INFO_CACHE_CAPACITY: usize = 128;

/// Key-information summaries keyed by the exact extracted resume text.
#[derive(Clone)]
pub struct KeyInfoCache {
    inner: Arc<Mutex<LruCache<String, String>>>,
}

impl KeyInfoCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Returns the cached summary for `key`, or runs `load` and caches its
    /// success. Failures pass through uncached, so a transient model error
    /// does not poison the key. The lock is never held across `load`.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, load: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        {
            let mut cache = self.inner.lock().await;
            if let Some(hit) = cache.get(key) {
                return Ok(hit.clone());
            }
        }

        let value = load().await?;

        let mut cache = self.inner.lock().await;
        cache.put(key.to_string(), value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counting(counter: &AtomicUsize, value: &str) -> Result<String, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }

    #[tokio::test]
    async fn test_second_identical_lookup_is_served_from_cache() {
        let cache = KeyInfoCache::new(8);
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_try_insert_with("resume text", || load_counting(&calls, "summary"))
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert_with("resume text", || load_counting(&calls, "summary"))
            .await
            .unwrap();

        assert_eq!(first, "summary");
        assert_eq!(second, "summary");
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "identical text must invoke the loader at most once"
        );
    }

    #[tokio::test]
    async fn test_distinct_keys_load_separately() {
        let cache = KeyInfoCache::new(8);
        let calls = AtomicUsize::new(0);

        let a = cache
            .get_or_try_insert_with("resume a", || load_counting(&calls, "summary a"))
            .await
            .unwrap();
        let b = cache
            .get_or_try_insert_with("resume b", || load_counting(&calls, "summary b"))
            .await
            .unwrap();

        assert_eq!(a, "summary a");
        assert_eq!(b, "summary b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = KeyInfoCache::new(8);
        let calls = AtomicUsize::new(0);

        let failed: Result<String, String> = cache
            .get_or_try_insert_with("resume text", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("model unavailable".to_string())
            })
            .await;
        assert!(failed.is_err());

        let recovered = cache
            .get_or_try_insert_with("resume text", || load_counting(&calls, "summary"))
            .await
            .unwrap();

        assert_eq!(recovered, "summary");
        assert_eq!(
            calls.load(Ordering::SeqCst),
            2,
            "a failed load must not occupy the key"
        );
    }

    #[tokio::test]
    async fn test_least_recently_used_entry_is_evicted() {
        let cache = KeyInfoCache::new(1);
        let calls = AtomicUsize::new(0);

        cache
            .get_or_try_insert_with("first", || load_counting(&calls, "one"))
            .await
            .unwrap();
        cache
            .get_or_try_insert_with("second", || load_counting(&calls, "two"))
            .await
            .unwrap();
        // "first" was evicted by "second", so this loads again.
        cache
            .get_or_try_insert_with("first", || load_counting(&calls, "one"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
