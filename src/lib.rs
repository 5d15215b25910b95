//! Evict Cache - An in-memory key/value cache
//!
//! Bounds entries by count (least recently used go first) and by time since
//! last touch (sliding TTL, enforced by per-key Tokio timers).

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod shell;
pub mod tasks;

pub use cache::{CacheItem, CacheKey, CacheStats, EvictionCache};
pub use config::CacheOptions;
pub use error::{CacheError, Result};
