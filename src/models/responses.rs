//! Shell replies
//!
//! Every command answers with one JSON object on its own line.

use serde::Serialize;

use crate::cache::{CacheItem, CacheStats};

/// Reply to any shell command.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Set(SetResponse),
    Get(GetResponse),
    Delete(DeleteResponse),
    List(ListResponse),
    Size(SizeResponse),
    Stats(StatsResponse),
    Limits(LimitsResponse),
    Slept(SleptResponse),
    Help(HelpResponse),
    Error(ErrorResponse),
}

/// Reply to `set`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Reply to `get`; `value` is null when the key is absent
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Option<String>,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Reply to `del`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    /// False when the key was absent or blank
    pub removed: bool,
}

/// Reply to `list`, most recently touched first
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub entries: Vec<CacheItem<String, Option<String>>>,
}

/// Reply to `size`
#[derive(Debug, Clone, Serialize)]
pub struct SizeResponse {
    pub size: usize,
}

/// Reply to `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Reply to `max-size` and `max-age`; null means unbounded
#[derive(Debug, Clone, Serialize)]
pub struct LimitsResponse {
    pub max_size: Option<usize>,
    pub max_age_ms: Option<u128>,
}

/// Reply to `sleep`
#[derive(Debug, Clone, Serialize)]
pub struct SleptResponse {
    pub slept_ms: u64,
}

/// Reply to `help`
#[derive(Debug, Clone, Serialize)]
pub struct HelpResponse {
    pub commands: Vec<&'static str>,
}

/// Reply to a line that could not be parsed
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
