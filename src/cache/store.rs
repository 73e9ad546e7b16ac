use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use thiserror::Error;
use tracing::debug;

/// Cloneable fetch failure so one in-flight result can be fanned out to
/// every caller awaiting the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error(FetchError),
}

/// Point-in-time view of one cache slot, as handed to the UI layer.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: Option<V>,
    pub status: QueryStatus,
    pub stale: bool,
}

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

struct EntryState<V> {
    value: Option<V>,
    status: QueryStatus,
    stale: bool,
    inflight: Option<SharedFetch<V>>,
}

impl<V> Default for EntryState<V> {
    fn default() -> Self {
        Self {
            value: None,
            status: QueryStatus::Idle,
            stale: false,
            inflight: None,
        }
    }
}

/// Read-through cache keyed by resource query.
///
/// At most one outstanding network request exists per key: concurrent
/// readers of a loading key await the same shared future. Completion is
/// applied only while the entry still points at that request, so
/// invalidating a key mid-flight discards the late result instead of
/// resurrecting it.
pub struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, EntryState<V>>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, EntryState<V>>> {
        self.entries.lock().expect("cache mutex poisoned")
    }

    /// Read the value for `key`, fetching it with `fetcher` if the slot
    /// is empty, stale, or errored. A fresh successful slot returns the
    /// cached value without touching the network.
    pub async fn fetch_with<F>(&self, key: K, fetcher: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<V, FetchError>>,
    {
        enum Plan<V> {
            Cached(V),
            Join(SharedFetch<V>),
            Run(SharedFetch<V>),
        }

        let plan = {
            let mut entries = self.lock();
            let state = entries.entry(key.clone()).or_default();
            let fresh = !state.stale && state.status == QueryStatus::Success;
            if let Some(inflight) = &state.inflight {
                Plan::Join(inflight.clone())
            } else if let Some(value) = state.value.clone().filter(|_| fresh) {
                Plan::Cached(value)
            } else {
                let shared = fetcher().shared();
                state.inflight = Some(shared.clone());
                state.status = QueryStatus::Loading;
                Plan::Run(shared)
            }
        };

        match plan {
            Plan::Cached(value) => Ok(value),
            Plan::Join(shared) => shared.await,
            Plan::Run(shared) => {
                let result = shared.clone().await;
                let mut entries = self.lock();
                if let Some(state) = entries.get_mut(&key) {
                    let still_ours = state
                        .inflight
                        .as_ref()
                        .is_some_and(|current| current.ptr_eq(&shared));
                    if still_ours {
                        state.inflight = None;
                        match &result {
                            Ok(value) => {
                                state.value = Some(value.clone());
                                state.status = QueryStatus::Success;
                                state.stale = false;
                            }
                            Err(err) => {
                                state.status = QueryStatus::Error(err.clone());
                            }
                        }
                    } else {
                        // Key was invalidated while the request was in
                        // flight; nobody observes this result anymore.
                        debug!("discarding fetch result for invalidated key");
                    }
                }
                result
            }
        }
    }

    /// Mark the slot stale so the next read refetches, and detach any
    /// in-flight request so its completion is discarded.
    pub fn invalidate(&self, key: &K) {
        let mut entries = self.lock();
        if let Some(state) = entries.get_mut(key) {
            state.stale = true;
            state.inflight = None;
        }
    }

    /// Clone of the current value, staleness notwithstanding.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).and_then(|state| state.value.clone())
    }

    /// Store a value directly, marking the slot fresh.
    pub fn set(&self, key: K, value: V) {
        let mut entries = self.lock();
        let state = entries.entry(key).or_default();
        state.value = Some(value);
        state.status = QueryStatus::Success;
        state.stale = false;
    }

    /// Capture the rollback snapshot for an optimistic mutation. Owned
    /// exclusively by that mutation until committed or restored.
    pub fn snapshot(&self, key: &K) -> Option<V> {
        self.get(key)
    }

    /// Edit the cached value in place (the optimistic write). A slot
    /// with no value is left untouched.
    pub fn apply(&self, key: &K, edit: impl FnOnce(&mut V)) {
        let mut entries = self.lock();
        if let Some(state) = entries.get_mut(key) {
            if let Some(value) = state.value.as_mut() {
                edit(value);
            }
        }
    }

    /// Put the snapshot back exactly as captured, undoing this
    /// mutation's optimistic edit and nothing else.
    pub fn restore(&self, key: &K, snapshot: Option<V>) {
        let mut entries = self.lock();
        let state = entries.entry(key.clone()).or_default();
        state.value = snapshot;
    }

    pub fn is_stale(&self, key: &K) -> bool {
        self.lock().get(key).is_some_and(|state| state.stale)
    }

    pub fn entry(&self, key: &K) -> CacheEntry<V> {
        let entries = self.lock();
        match entries.get(key) {
            Some(state) => CacheEntry {
                value: state.value.clone(),
                status: state.status.clone(),
                stale: state.stale,
            },
            None => CacheEntry {
                value: None,
                status: QueryStatus::Idle,
                stale: false,
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_fetcher(
        counter: &Arc<AtomicUsize>,
        value: Vec<&'static str>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Vec<&'static str>, FetchError>> {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let cache: QueryCache<(), Vec<&str>> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch_with((), counting_fetcher(&calls, vec!["x"])),
            cache.fetch_with((), counting_fetcher(&calls, vec!["y"])),
        );

        assert_eq!(a.expect("first fetch"), vec!["x"]);
        assert_eq!(b.expect("second fetch"), vec!["x"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fresh_value_served_from_cache() {
        let cache: QueryCache<(), Vec<&str>> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch_with((), counting_fetcher(&calls, vec!["x"]))
            .await
            .expect("first fetch");
        cache
            .fetch_with((), counting_fetcher(&calls, vec!["y"]))
            .await
            .expect("cached read");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache: QueryCache<(), Vec<&str>> = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch_with((), counting_fetcher(&calls, vec!["x"]))
            .await
            .expect("first fetch");
        cache.invalidate(&());
        assert!(cache.is_stale(&()));

        let value = cache
            .fetch_with((), counting_fetcher(&calls, vec!["y"]))
            .await
            .expect("refetch");
        assert_eq!(value, vec!["y"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.is_stale(&()));
    }

    #[tokio::test]
    async fn test_failed_fetch_records_error_and_retries() {
        let cache: QueryCache<(), Vec<&str>> = QueryCache::new();

        let result = cache
            .fetch_with((), || {
                async { Err(FetchError::new("boom")) }.boxed()
            })
            .await;
        assert!(result.is_err());
        assert_eq!(
            cache.entry(&()).status,
            QueryStatus::Error(FetchError::new("boom"))
        );

        // An errored slot is not served from cache.
        let value = cache
            .fetch_with((), || async { Ok(vec!["x"]) }.boxed())
            .await
            .expect("retry");
        assert_eq!(value, vec!["x"]);
        assert_eq!(cache.entry(&()).status, QueryStatus::Success);
    }

    #[tokio::test]
    async fn test_snapshot_apply_restore_round_trip() {
        let cache: QueryCache<(), Vec<&str>> = QueryCache::new();
        cache.set((), vec!["A", "B", "C"]);

        let snapshot = cache.snapshot(&());
        cache.apply(&(), |items| items.retain(|item| *item != "B"));
        assert_eq!(cache.get(&()), Some(vec!["A", "C"]));

        cache.restore(&(), snapshot);
        assert_eq!(cache.get(&()), Some(vec!["A", "B", "C"]));
    }

    #[tokio::test]
    async fn test_invalidate_mid_flight_discards_result() {
        let cache = Arc::new(QueryCache::<(), Vec<&str>>::new());

        let reader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .fetch_with((), || {
                        async {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(vec!["late"])
                        }
                        .boxed()
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate(&());

        // The caller still gets its result, but the cache does not
        // apply a value nobody observes anymore.
        let result = reader.await.expect("join").expect("fetch");
        assert_eq!(result, vec!["late"]);
        assert_eq!(cache.get(&()), None);
    }

    #[test]
    fn test_entry_for_unknown_key_is_idle() {
        let cache: QueryCache<i64, Vec<&str>> = QueryCache::new();
        let entry = cache.entry(&42);
        assert_eq!(entry.status, QueryStatus::Idle);
        assert!(entry.value.is_none());
        assert!(!entry.stale);
    }
}
