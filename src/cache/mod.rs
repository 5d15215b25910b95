//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and sliding TTL expiration.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheItem, Entries, EvictionCache};
