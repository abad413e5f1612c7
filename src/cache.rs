use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-wide memo of constructed rows, keyed by row key.
///
/// Entries are never evicted. `new` is `const`, so a cache can live in a
/// `static`:
///
/// ```
/// use csvdict::RowCache;
///
/// static SQUARES: RowCache<u32, u64> = RowCache::new();
///
/// let nine = SQUARES.get_or_try_insert_with(3, || Ok::<_, ()>(9)).unwrap();
/// assert_eq!(*nine, 9);
/// assert_eq!(SQUARES.len(), 1);
/// ```
#[derive(Debug)]
pub struct RowCache<K, V> {
    entries: Mutex<Option<HashMap<K, Arc<V>>>>,
}

impl<K, V> RowCache<K, V> {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<HashMap<K, Arc<V>>>> {
        // a panicking initializer leaves the map itself intact
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for RowCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> RowCache<K, V> {
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.lock().as_ref()?.get(key).cloned()
    }

    /// Returns the cached value for `key`, or runs `init` and caches its
    /// result. `init` runs under the cache lock and must not touch this cache.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, init: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let mut guard = self.lock();
        let entries = guard.get_or_insert_with(HashMap::new);
        if let Some(found) = entries.get(&key) {
            return Ok(Arc::clone(found));
        }
        let value = Arc::new(init()?);
        entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    /// Stores `value` unless `key` is already cached; returns whichever is cached.
    pub fn insert_if_absent(&self, key: K, value: V) -> Arc<V> {
        let mut guard = self.lock();
        Arc::clone(
            guard
                .get_or_insert_with(HashMap::new)
                .entry(key)
                .or_insert_with(|| Arc::new(value)),
        )
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().as_ref().is_some_and(|e| e.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> RowCache<i64, V> {
    /// Caches a row that has no source key under a fresh one: one past the
    /// larger of `floor` and the largest key cached so far.
    pub fn insert_next_id(&self, floor: i64, value: V) -> i64 {
        let mut guard = self.lock();
        let entries = guard.get_or_insert_with(HashMap::new);
        let id = entries
            .keys()
            .copied()
            .fold(floor, i64::max)
            .saturating_add(1);
        entries.insert(id, Arc::new(value));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_runs_once_per_key() {
        let cache: RowCache<String, usize> = RowCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let v = cache
                .get_or_try_insert_with("a".to_string(), || {
                    calls += 1;
                    Ok::<_, ()>(7)
                })
                .unwrap();
            assert_eq!(*v, 7);
        }
        assert_eq!(calls, 1);
        assert!(cache.contains_key(&"a".to_string()));
    }

    #[test]
    fn failed_init_caches_nothing() {
        let cache: RowCache<u8, u8> = RowCache::new();
        assert_eq!(cache.get_or_try_insert_with(1, || Err("nope")), Err("nope"));
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let cache: RowCache<u8, &str> = RowCache::new();
        assert_eq!(*cache.insert_if_absent(1, "first"), "first");
        assert_eq!(*cache.insert_if_absent(1, "second"), "first");
    }

    #[test]
    fn next_id_starts_above_floor() {
        let cache: RowCache<i64, &str> = RowCache::new();
        assert_eq!(cache.insert_next_id(5000, "a"), 5001);
        assert_eq!(cache.insert_next_id(5000, "b"), 5002);
        cache.insert_if_absent(9000, "c");
        assert_eq!(cache.insert_next_id(5000, "d"), 9001);
    }
}
