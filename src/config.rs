//! Configuration Module
//!
//! Cache construction options and their normalization. Invalid values never
//! fail: anything that is not a positive number means "unbounded".

use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// Environment variable holding the max age in milliseconds.
pub const ENV_MAX_AGE_MS: &str = "CACHE_MAX_AGE_MS";
/// Environment variable holding the max entry count.
pub const ENV_MAX_SIZE: &str = "CACHE_MAX_SIZE";

/// Options accepted by [`EvictionCache::new`](crate::EvictionCache::new).
///
/// `None` means unbounded for both limits, which is also the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOptions")]
pub struct CacheOptions {
    /// Time since last touch after which a key is dropped
    pub max_age: Option<Duration>,
    /// Number of keys kept before the least recently touched is dropped
    pub max_size: Option<NonZeroUsize>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the max age. `Duration::ZERO` means unbounded.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = normalize_max_age(max_age);
        self
    }

    /// Sets the max size. `0` means unbounded.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = NonZeroUsize::new(max_size);
        self
    }

    /// Loads options from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_AGE_MS` - Max age in milliseconds (default: unbounded)
    /// - `CACHE_MAX_SIZE` - Max entry count (default: unbounded)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Loads options through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |name: &str| lookup(name).and_then(|v| v.trim().parse::<f64>().ok());

        Self {
            max_age: number(ENV_MAX_AGE_MS).and_then(normalize_max_age_ms),
            max_size: number(ENV_MAX_SIZE).and_then(normalize_max_size),
        }
    }

    /// Parses options from a JSON object such as `{"maxAge": 60000, "maxSize": 100}`.
    ///
    /// Unknown keys are ignored and bad values normalize to unbounded; only
    /// malformed JSON is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOptions {
    max_age: Option<Value>,
    max_size: Option<Value>,
}

impl From<RawOptions> for CacheOptions {
    fn from(raw: RawOptions) -> Self {
        Self {
            max_age: raw
                .max_age
                .as_ref()
                .and_then(Value::as_f64)
                .and_then(normalize_max_age_ms),
            max_size: raw
                .max_size
                .as_ref()
                .and_then(Value::as_f64)
                .and_then(normalize_max_size),
        }
    }
}

// == Normalization ==
/// Zero duration means unbounded.
pub fn normalize_max_age(max_age: Duration) -> Option<Duration> {
    (!max_age.is_zero()).then_some(max_age)
}

/// Converts a millisecond count into a max age.
///
/// NaN, infinite, zero and negative values (and values too large to
/// represent) are unbounded.
pub fn normalize_max_age_ms(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(ms / 1000.0)
        .ok()
        .and_then(normalize_max_age)
}

/// Converts a numeric count into a max size, flooring fractions.
///
/// Anything below one, NaN, or infinite is unbounded.
pub fn normalize_max_size(n: f64) -> Option<NonZeroUsize> {
    if !n.is_finite() || n < 1.0 || n >= usize::MAX as f64 {
        return None;
    }
    NonZeroUsize::new(n.floor() as usize)
}
