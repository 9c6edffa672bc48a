//! Time- and size-bounded in-process store for upstream payloads.

use analysis_core::Clock;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Internal cache entry. Never mutated after insert; a refresh replaces it.
struct CacheEntry<V> {
    payload: Arc<V>,
    expires_at: DateTime<Utc>,
    /// Insertion order, used to pick eviction victims
    seq: u64,
}

/// Concurrent TTL cache with a hard entry limit.
///
/// Reads go straight to the sharded map and never wait on each other.
/// Writes are serialized so the capacity check and the insert happen as one
/// step; expired entries are dropped lazily on read and in bulk when a write
/// finds the cache full.
pub struct ResultCache<V = serde_json::Value> {
    entries: DashMap<String, CacheEntry<V>>,
    write_lock: Mutex<()>,
    next_seq: AtomicU64,
    capacity: usize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V> ResultCache<V> {
    pub fn new(capacity: usize, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            write_lock: Mutex::new(()),
            next_seq: AtomicU64::new(0),
            capacity,
            default_ttl,
            clock,
        }
    }

    /// The payload under `key`, if present and not yet expired.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(key)?;
            if now < entry.expires_at {
                return Some(Arc::clone(&entry.payload));
            }
        }

        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }

    /// Store `payload` under `key` with the default TTL.
    pub fn insert(&self, key: String, payload: V) -> Arc<V> {
        self.put(key, payload, self.default_ttl)
    }

    /// Store `payload` under `key` for `ttl`, evicting first if the cache is full.
    ///
    /// Returns the shared payload so the caller can use it without a second lookup.
    pub fn put(&self, key: String, payload: V, ttl: Duration) -> Arc<V> {
        let payload = Arc::new(payload);
        if self.capacity == 0 || ttl.is_zero() {
            return payload;
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.make_room(now);
        }

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.insert(
            key,
            CacheEntry {
                payload: Arc::clone(&payload),
                expires_at,
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            },
        );

        payload
    }

    /// Drop expired entries, then the oldest live ones until one slot is free.
    /// Caller holds the write lock.
    fn make_room(&self, now: DateTime<Utc>) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        let expired = before.saturating_sub(self.entries.len());

        let mut evicted = 0;
        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().seq)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                    evicted += 1;
                }
                None => break,
            }
        }

        tracing::debug!(
            "Cache full ({} entries): dropped {} expired, evicted {} live",
            self.capacity,
            expired,
            evicted
        );
    }

    /// Entries currently held, including any that expired but were not yet touched
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
