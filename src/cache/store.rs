//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and
//! per-key sliding expiry timers.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::config::{normalize_max_age, CacheOptions};
use crate::tasks::{spawn_expiry_task, timers_enabled, ExpiryTimer};

// == Eviction Cache ==
/// Key/value cache bounded by entry count (LRU) and by time since last
/// touch (sliding TTL).
///
/// Every `put` and every successful `get` moves the key to the front of the
/// recency order and restarts its expiry countdown. Expiry runs on Tokio
/// timers: the cache uses the runtime it was created in, or the one passed to
/// [`EvictionCache::with_handle`]. That runtime must have its time driver
/// enabled (`enable_time` or `enable_all`); a runtime without one is
/// rejected with a warning and keys then never expire.
///
/// A blank key may hold an absent value: `put(0, None)` stores it,
/// `get(&0)` then returns `None`, and `entries()` yields it with a `None`
/// value.
///
/// ```
/// use evict_cache::{CacheOptions, EvictionCache};
///
/// let mut cache = EvictionCache::new(CacheOptions::new().with_max_size(2));
/// cache.put(1, "one");
/// cache.put(2, "two");
/// cache.put(3, "three");
///
/// let keys: Vec<i32> = cache.entries().map(|item| item.key).collect();
/// assert_eq!(keys, vec![3, 2]);
/// assert_eq!(cache.get(&1), None);
/// ```
pub struct EvictionCache<K: CacheKey, V> {
    shared: Arc<Mutex<Shared<K, V>>>,
}

/// Where expiry timers get spawned.
#[derive(Debug)]
enum TimerRuntime {
    /// No runtime seen yet; looked up again at every scheduling point
    Unknown,
    Ready(Handle),
    /// The runtime has no time driver
    Unavailable,
}

/// State shared with the expiry tasks.
struct Shared<K, V> {
    /// Key-value storage; only blank keys can hold `None`
    entries: HashMap<K, CacheEntry<Option<V>>>,
    /// Recency order
    lru: LruTracker<K>,
    stats: CacheStats,
    max_size: Option<NonZeroUsize>,
    max_age: Option<Duration>,
    runtime: TimerRuntime,
    next_timer_id: u64,
    warned_no_runtime: bool,
}

impl<K: CacheKey, V: Send + 'static> EvictionCache<K, V> {
    // == Constructor ==
    /// Creates a cache, capturing the current Tokio runtime (if any) for
    /// expiry timers.
    pub fn new(options: CacheOptions) -> Self {
        Self::build(options, Handle::try_current().ok())
    }

    /// Creates a cache whose expiry timers run on `handle`.
    ///
    /// `handle` must belong to a runtime with timers enabled; otherwise a
    /// warning is logged and entries never expire.
    pub fn with_handle(options: CacheOptions, handle: Handle) -> Self {
        Self::build(options, Some(handle))
    }

    fn build(options: CacheOptions, handle: Option<Handle>) -> Self {
        debug!(
            "Creating cache: max_size={:?}, max_age={:?}",
            options.max_size, options.max_age
        );

        let mut warned_no_runtime = false;
        let runtime = match handle {
            Some(handle) if timers_enabled(&handle) => TimerRuntime::Ready(handle),
            Some(_) => {
                warn!("Tokio runtime has timers disabled, cache entries will not expire");
                warned_no_runtime = true;
                TimerRuntime::Unavailable
            }
            None => TimerRuntime::Unknown,
        };

        Self {
            shared: Arc::new(Mutex::new(Shared {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
                max_size: options.max_size,
                max_age: options.max_age,
                runtime,
                next_timer_id: 0,
                warned_no_runtime,
            })),
        }
    }

    // == Put ==
    /// Inserts or updates `key`.
    ///
    /// Passing `None` as the value removes a non-blank key instead. A blank
    /// key is stored with the absent value like any other upsert. Inserting
    /// may evict the least recently touched keys to respect the size bound.
    pub fn put(&mut self, key: K, value: impl Into<Option<V>>) {
        let value = value.into();
        if value.is_none() && !key.is_blank() {
            self.remove(&key);
            return;
        }

        let mut state = self.shared.lock();
        state.lru.touch(&key);
        match state.entries.get_mut(&key) {
            Some(entry) => entry.value = value,
            None => {
                state.entries.insert(key.clone(), CacheEntry::new(value));
            }
        }

        state.enforce_max_size();
        state.reschedule(&Arc::downgrade(&self.shared), &key);
    }

    // == Remove ==
    /// Removes `key` and cancels its expiry timer, returning its value.
    ///
    /// Blank keys (`0`, `""`, `false`, `None`) are never removed this way;
    /// they only leave through expiry or LRU eviction.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if key.is_blank() {
            debug!("Ignoring removal of blank key");
            return None;
        }

        let mut state = self.shared.lock();
        let entry = state.entries.remove(key)?;
        state.lru.remove(key);
        entry.into_value()
    }

    // == Expire In ==
    /// Restarts the countdown of `key` with a one-off `ttl`.
    ///
    /// Recency is untouched, and the next `put` or `get` goes back to the
    /// cache's max age. Absent keys are ignored.
    pub fn expire_in(&mut self, key: &K, ttl: Duration) {
        let this = Arc::downgrade(&self.shared);
        let mut state = self.shared.lock();
        state.schedule(&this, key, Some(ttl));
    }

    // == Contains ==
    /// Checks for `key` without touching it.
    pub fn contains_key(&self, key: &K) -> bool {
        self.shared.lock().entries.contains_key(key)
    }

    // == Time To Live ==
    /// Remaining time before `key` expires, without touching it.
    ///
    /// None if the key is absent or never expires.
    pub fn ttl_remaining(&self, key: &K) -> Option<Duration> {
        self.shared
            .lock()
            .entries
            .get(key)
            .and_then(CacheEntry::ttl_remaining)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.shared.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.shared.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Limits ==
    /// Current size bound, None when unbounded.
    pub fn max_size(&self) -> Option<usize> {
        self.shared.lock().max_size.map(NonZeroUsize::get)
    }

    /// Current age bound, None when unbounded.
    pub fn max_age(&self) -> Option<Duration> {
        self.shared.lock().max_age
    }

    /// Changes the size bound (`0` means unbounded) and evicts immediately.
    pub fn set_max_size(&mut self, max_size: usize) {
        let mut state = self.shared.lock();
        state.max_size = NonZeroUsize::new(max_size);
        info!("Max size set to {:?}", state.max_size);
        state.enforce_max_size();
    }

    /// Changes the age bound (`Duration::ZERO` means unbounded).
    ///
    /// Every live key's countdown restarts from now with the new duration.
    pub fn set_max_age(&mut self, max_age: Duration) {
        let this = Arc::downgrade(&self.shared);
        let mut state = self.shared.lock();
        state.max_age = normalize_max_age(max_age);
        info!("Max age set to {:?}", state.max_age);

        let keys: Vec<K> = state.lru.iter().cloned().collect();
        for key in &keys {
            state.reschedule(&this, key);
        }
    }
}

impl<K: CacheKey, V: Clone + Send + 'static> EvictionCache<K, V> {
    // == Get ==
    /// Returns a clone of the value for `key`.
    ///
    /// A hit moves the key to the front and restarts its expiry countdown;
    /// a miss has no effect on the cache. A blank key holding an absent
    /// value is a hit that returns `None`.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let this = Arc::downgrade(&self.shared);
        let mut state = self.shared.lock();
        if !state.entries.contains_key(key) {
            state.stats.record_miss();
            return None;
        }

        state.stats.record_hit();
        state.lru.touch(key);
        state.reschedule(&this, key);
        state.entries.get(key).and_then(|entry| entry.value.clone())
    }

    // == Entries ==
    /// Snapshot of the entries, most recently touched first.
    ///
    /// Values are `None` only for blank keys stored with an absent value.
    pub fn entries(&self) -> Entries<K, Option<V>> {
        let state = self.shared.lock();
        let items: Vec<CacheItem<K, Option<V>>> = state
            .lru
            .iter()
            .filter_map(|key| {
                state.entries.get(key).map(|entry| CacheItem {
                    key: key.clone(),
                    value: entry.value.clone(),
                })
            })
            .collect();

        Entries {
            inner: items.into_iter(),
        }
    }
}

impl<K: CacheKey, V: Send + 'static> Default for EvictionCache<K, V> {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl<K: CacheKey, V> fmt::Debug for EvictionCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("EvictionCache")
            .field("len", &state.lru.len())
            .field("max_size", &state.max_size)
            .field("max_age", &state.max_age)
            .finish()
    }
}

impl<K: CacheKey, V> Shared<K, V> {
    /// Drops least recently touched keys until the size bound holds.
    fn enforce_max_size(&mut self) {
        let Some(max_size) = self.max_size else {
            return;
        };

        while self.lru.len() > max_size.get() {
            let Some(victim) = self.lru.evict_oldest() else {
                break;
            };
            if self.entries.remove(&victim).is_some() {
                self.stats.record_eviction();
                debug!("Evicted least recently used key");
            }
        }
    }

    /// Restarts the expiry countdown for `key` with the max age.
    fn reschedule(&mut self, this: &Weak<Mutex<Self>>, key: &K)
    where
        V: Send + 'static,
    {
        let max_age = self.max_age;
        self.schedule(this, key, max_age);
    }

    /// Replaces any pending timer of `key` with one firing after `ttl`.
    /// `None` leaves the key without a timer.
    fn schedule(&mut self, this: &Weak<Mutex<Self>>, key: &K, ttl: Option<Duration>)
    where
        V: Send + 'static,
    {
        if !self.entries.contains_key(key) {
            return;
        }

        let timer = match ttl {
            Some(ttl) => self.spawn_timer(this, key, ttl),
            None => None,
        };

        if let Some(entry) = self.entries.get_mut(key) {
            match timer {
                Some(timer) => entry.arm(timer),
                None => entry.disarm(),
            }
        }
    }

    fn spawn_timer(&mut self, this: &Weak<Mutex<Self>>, key: &K, ttl: Duration) -> Option<ExpiryTimer>
    where
        V: Send + 'static,
    {
        let handle = self.timer_runtime()?;
        // Deadlines past the clock's range never fire.
        let deadline = Instant::now().checked_add(ttl)?;

        self.next_timer_id += 1;
        let id = self.next_timer_id;
        let shared = Weak::clone(this);
        let expired = key.clone();

        let task = spawn_expiry_task(&handle, deadline, move || {
            if let Some(shared) = shared.upgrade() {
                shared.lock().expire(&expired, id);
            }
        });

        Some(ExpiryTimer::new(id, deadline, task))
    }

    fn timer_runtime(&mut self) -> Option<Handle> {
        if let TimerRuntime::Unknown = self.runtime {
            match Handle::try_current() {
                Ok(handle) if timers_enabled(&handle) => self.runtime = TimerRuntime::Ready(handle),
                Ok(_) => self.runtime = TimerRuntime::Unavailable,
                Err(_) => {}
            }
        }

        match &self.runtime {
            TimerRuntime::Ready(handle) => Some(handle.clone()),
            _ => {
                if !self.warned_no_runtime {
                    warn!("No Tokio runtime with timers available, cache entries will not expire");
                    self.warned_no_runtime = true;
                }
                None
            }
        }
    }

    /// Called by the expiry task for `key`. No-op unless timer `id` is still
    /// the key's current timer.
    fn expire(&mut self, key: &K, id: u64) {
        let current = self.entries.get(key).and_then(CacheEntry::timer_id);
        if current != Some(id) {
            debug!("Ignoring stale expiry timer {}", id);
            return;
        }

        if let Some(entry) = self.entries.remove(key) {
            self.lru.remove(key);
            self.stats.record_expiration();
            drop(entry.into_value_from_timer());
            debug!("Expired key (timer {})", id);
        }
    }
}

// == Cache Item ==
/// A key/value pair yielded by [`EvictionCache::entries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheItem<K, V> {
    pub key: K,
    pub value: V,
}

// == Entries ==
/// Iterator over a snapshot of the cache, most recently touched first.
#[derive(Debug)]
pub struct Entries<K, V> {
    inner: std::vec::IntoIter<CacheItem<K, V>>,
}

impl<K, V> Iterator for Entries<K, V> {
    type Item = CacheItem<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Entries<K, V> {}

impl<'a, K: CacheKey, V: Clone + Send + 'static> IntoIterator for &'a EvictionCache<K, V> {
    type Item = CacheItem<K, Option<V>>;
    type IntoIter = Entries<K, Option<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}
