//! Typed per-request memoization.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// A typed key into a [`RequestCache`].
///
/// The key type itself is the identity; implementors are usually unit structs.
pub trait CacheKey: 'static {
    /// Value memoized under this key. `Option` values memoize absence too.
    type Value: Clone + Send + Sync + 'static;
}

type Slot = Arc<dyn Any + Send + Sync>;

/// Lazy populate-once store scoped to a single request.
///
/// The slot map lock is held only to find or create a key's slot; the
/// computation itself runs outside it, so a computation may read other keys.
/// Recursively computing the *same* key deadlocks.
#[derive(Default)]
pub struct RequestCache {
    slots: Mutex<HashMap<TypeId, Slot>>,
}

impl RequestCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value stored under `K`, computing it on first use.
    ///
    /// `compute` runs at most once per key for the lifetime of this cache,
    /// even when called concurrently from several tasks of the same request.
    pub fn get_or_compute<K, F>(&self, compute: F) -> K::Value
    where
        K: CacheKey,
        F: FnOnce() -> K::Value,
    {
        self.slot::<K>().get_or_init(compute).clone()
    }

    /// Return the stored value for `K` without computing it.
    pub fn get<K: CacheKey>(&self) -> Option<K::Value> {
        let slots = self.slots.lock();
        let slot = slots.get(&TypeId::of::<K>())?;
        slot.downcast_ref::<OnceLock<K::Value>>()?.get().cloned()
    }

    /// Check whether `K` has been populated.
    pub fn contains<K: CacheKey>(&self) -> bool {
        self.get::<K>().is_some()
    }

    /// Number of keys requested so far.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Check if no key has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn slot<K: CacheKey>(&self) -> Arc<OnceLock<K::Value>> {
        let key = TypeId::of::<K>();
        let mut slots = self.slots.lock();
        if let Some(slot) = slots
            .get(&key)
            .and_then(|slot| Arc::clone(slot).downcast::<OnceLock<K::Value>>().ok())
        {
            return slot;
        }

        let slot = Arc::new(OnceLock::<K::Value>::new());
        slots.insert(key, Arc::clone(&slot) as Slot);
        slot
    }
}

impl std::fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("keys", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Answer;
    impl CacheKey for Answer {
        type Value = Option<u32>;
    }

    struct Greeting;
    impl CacheKey for Greeting {
        type Value = String;
    }

    struct Farewell;
    impl CacheKey for Farewell {
        type Value = String;
    }

    #[test]
    fn computes_once_per_key() {
        let cache = RequestCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..5 {
            let value = cache.get_or_compute::<Answer, _>(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Some(42)
            });
            assert_eq!(value, Some(42));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stored_none_is_not_recomputed() {
        let cache = RequestCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute::<Answer, _>(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        });
        let second = cache.get_or_compute::<Answer, _>(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some(1)
        });

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains::<Answer>());
    }

    #[test]
    fn keys_are_independent() {
        let cache = RequestCache::new();
        assert!(cache.is_empty());

        cache.get_or_compute::<Answer, _>(|| Some(7));
        let greeting = cache.get_or_compute::<Greeting, _>(|| "hello".to_string());

        assert_eq!(greeting, "hello");
        assert_eq!(cache.get::<Answer>(), Some(Some(7)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn keys_sharing_a_value_type_keep_separate_slots() {
        let cache = RequestCache::new();
        cache.get_or_compute::<Greeting, _>(|| "hello".to_string());
        let farewell = cache.get_or_compute::<Farewell, _>(|| "bye".to_string());

        assert_eq!(farewell, "bye");
        assert_eq!(cache.get::<Greeting>().as_deref(), Some("hello"));
        assert_eq!(cache.get_or_compute::<Greeting, _>(|| unreachable!()), "hello");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn computation_may_read_other_keys() {
        let cache = RequestCache::new();
        cache.get_or_compute::<Answer, _>(|| Some(2));
        let greeting = cache.get_or_compute::<Greeting, _>(|| {
            format!("{:?}", cache.get::<Answer>())
        });
        assert_eq!(greeting, "Some(Some(2))");
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache = Arc::new(RequestCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache.get_or_compute::<Answer, _>(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        Some(9)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(9));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
