//! TTL cache for generated model output.
//!
//! The generation service owns one `TtlCache` per task; nothing else holds
//! generation results. Each key maps to a slot backed by a `tokio::sync::OnceCell`,
//! so concurrent callers for the same key await a single producer call.
//! A failed producer leaves the slot empty and the next caller retries.
//! Expired slots are replaced on the next access.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use tracing::debug;

/// Default TTL of a generated response: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Stored<V> {
    value: V,
    expires_at: Instant,
}

struct Slot<V> {
    cell: OnceCell<Stored<V>>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Empty and in-flight slots never count as expired.
    fn is_expired(&self, now: Instant) -> bool {
        self.cell
            .get()
            .is_some_and(|stored| now >= stored.expires_at)
    }
}

pub struct TtlCache<V> {
    slots: Mutex<HashMap<String, Arc<Slot<V>>>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live value under `key`, or runs `producer` and stores its
    /// output for `ttl`. Errors are returned as-is and never stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot_for(key).await;

        if slot.cell.initialized() {
            debug!(key_len = key.len(), "cache hit");
        } else {
            debug!(key_len = key.len(), "cache miss");
        }

        let stored = slot
            .cell
            .get_or_try_init(|| async move {
                let value = producer().await?;
                Ok(Stored {
                    value,
                    expires_at: Instant::now() + ttl,
                })
            })
            .await?;

        Ok(stored.value.clone())
    }

    /// Binds a producer to a key and TTL. Every `call()` on the result goes
    /// through the cache.
    pub fn memoize<F, Fut, E>(
        &self,
        producer: F,
        key: impl Into<String>,
        ttl: Duration,
    ) -> Memoized<'_, V, F>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        Memoized {
            cache: self,
            key: key.into(),
            ttl,
            producer,
        }
    }

    /// Drops expired entries and empty slots nobody is waiting on.
    /// Returns how many slots were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;
        let before = slots.len();
        slots.retain(|_, slot| {
            let abandoned = !slot.cell.initialized() && Arc::strong_count(slot) == 1;
            !(slot.is_expired(now) || abandoned)
        });
        before - slots.len()
    }

    /// Number of live (stored and unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let slots = self.slots.lock().await;
        slots
            .values()
            .filter(|slot| slot.cell.initialized() && !slot.is_expired(now))
            .count()
    }

    async fn slot_for(&self, key: &str) -> Arc<Slot<V>> {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get(key).filter(|slot| !slot.is_expired(now)) {
            return Arc::clone(slot);
        }

        let slot = Arc::new(Slot::new());
        slots.insert(key.to_string(), Arc::clone(&slot));
        slot
    }
}

/// A producer bound to a cache key. See [`TtlCache::memoize`].
pub struct Memoized<'a, V, F> {
    cache: &'a TtlCache<V>,
    key: String,
    ttl: Duration,
    producer: F,
}

impl<V, F, Fut, E> Memoized<'_, V, F>
where
    V: Clone + Send + Sync,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    pub async fn call(&self) -> Result<V, E> {
        self.cache
            .get_or_try_insert_with(&self.key, self.ttl, || (self.producer)())
            .await
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Cache key for a task: the task name followed by the JSON form of its input.
/// Struct fields serialize in declaration order, so equal inputs give equal keys.
pub fn cache_key<T: Serialize + ?Sized>(task: &str, input: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{task}:{}", serde_json::to_string(input)?))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    async fn produce(calls: &AtomicUsize, value: &str) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }

    async fn produce_slowly(calls: &AtomicUsize) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(2)).await;
        Ok("slow".to_string())
    }

    async fn fail(calls: &AtomicUsize) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Err("provider down".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_within_ttl_hits_cache() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let first = cache
            .get_or_try_insert_with("k", TTL, move || produce(calls, "first"))
            .await
            .unwrap();
        let second = cache
            .get_or_try_insert_with("k", TTL, move || produce(calls, "second"))
            .await
            .unwrap();

        assert_eq!(first, "first");
        assert_eq!(second, "first");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_after_ttl_reruns_producer() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        cache
            .get_or_try_insert_with("k", TTL, move || produce(calls, "old"))
            .await
            .unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        let fresh = cache
            .get_or_try_insert_with("k", TTL, move || produce(calls, "new"))
            .await
            .unwrap();

        assert_eq!(fresh, "new");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let err = cache
            .get_or_try_insert_with("k", TTL, move || fail(calls))
            .await
            .unwrap_err();
        assert_eq!(err, "provider down");

        let value = cache
            .get_or_try_insert_with("k", TTL, move || produce(calls, "recovered"))
            .await
            .unwrap();
        assert_eq!(value, "recovered");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_producer() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let (a, b) = tokio::join!(
            cache.get_or_try_insert_with("k", TTL, move || produce_slowly(calls)),
            cache.get_or_try_insert_with("k", TTL, move || produce_slowly(calls)),
        );

        assert_eq!(a.unwrap(), "slow");
        assert_eq!(b.unwrap(), "slow");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_are_independent() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        cache
            .get_or_try_insert_with("a", TTL, move || produce(calls, "a"))
            .await
            .unwrap();
        let b = cache
            .get_or_try_insert_with("b", TTL, move || produce(calls, "b"))
            .await
            .unwrap();

        assert_eq!(b, "b");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memoized_call_reuses_value() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let memo = cache.memoize(move || produce(calls, "memo"), "task:input", TTL);
        assert_eq!(memo.key(), "task:input");
        assert_eq!(memo.call().await.unwrap(), "memo");
        assert_eq!(memo.call().await.unwrap(), "memo");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_removes_expired_and_failed_slots() {
        let cache = TtlCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        cache
            .get_or_try_insert_with("short", Duration::from_secs(1), move || produce(calls, "x"))
            .await
            .unwrap();
        cache
            .get_or_try_insert_with("long", TTL, move || produce(calls, "y"))
            .await
            .unwrap();
        let _ = cache
            .get_or_try_insert_with("broken", TTL, move || fail(calls))
            .await;

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.len().await, 1);
    }

    #[test]
    fn test_cache_key_is_deterministic_per_input() {
        #[derive(Serialize)]
        struct Input<'a> {
            resume: &'a str,
            job: &'a str,
        }

        let a = cache_key("analyze-resume", &Input { resume: "r", job: "j" }).unwrap();
        let b = cache_key("analyze-resume", &Input { resume: "r", job: "j" }).unwrap();
        let c = cache_key("analyze-resume", &Input { resume: "r2", job: "j" }).unwrap();
        let d = cache_key("interview-chat", &Input { resume: "r", job: "j" }).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(a.starts_with("analyze-resume:"));
    }
}
