//! Shell Handlers
//!
//! Executes parsed commands against the session's cache.

use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::debug;

use crate::cache::EvictionCache;
use crate::config::{normalize_max_age_ms, normalize_max_size, CacheOptions};
use crate::models::{
    Command, DeleteResponse, GetResponse, HelpResponse, LimitsResponse, ListResponse, Reply,
    SetResponse, SizeResponse, SleptResponse, StatsResponse, USAGE,
};

/// State of one shell session: a string-keyed cache.
#[derive(Debug)]
pub struct Session {
    cache: EvictionCache<String, String>,
}

impl Session {
    pub fn new(cache: EvictionCache<String, String>) -> Self {
        Self { cache }
    }

    /// Creates a session with a fresh cache built from `options`.
    ///
    /// Must be called inside a Tokio runtime for keys to expire.
    pub fn from_options(options: CacheOptions) -> Self {
        Self::new(EvictionCache::new(options))
    }

    pub fn cache(&self) -> &EvictionCache<String, String> {
        &self.cache
    }

    /// Runs one command. Returns None when the session should end.
    pub async fn execute(&mut self, command: Command) -> Option<Reply> {
        debug!("Executing {:?}", command);

        let reply = match command {
            Command::Set { key, value } => {
                self.cache.put(key.clone(), value);
                Reply::Set(SetResponse::new(key))
            }
            Command::Get { key } => {
                let value = self.cache.get(&key);
                Reply::Get(GetResponse::new(key, value))
            }
            Command::Del { key } => {
                let removed = self.cache.remove(&key).is_some();
                Reply::Delete(DeleteResponse { key, removed })
            }
            Command::List => Reply::List(ListResponse {
                entries: self.cache.entries().collect(),
            }),
            Command::Size => Reply::Size(SizeResponse {
                size: self.cache.len(),
            }),
            Command::Stats => Reply::Stats(StatsResponse::from(self.cache.stats())),
            Command::MaxSize(size) => {
                if let Some(size) = size {
                    let size = normalize_max_size(size).map_or(0, NonZeroUsize::get);
                    self.cache.set_max_size(size);
                }
                Reply::Limits(self.limits())
            }
            Command::MaxAge(ms) => {
                if let Some(ms) = ms {
                    let max_age = normalize_max_age_ms(ms).unwrap_or(Duration::ZERO);
                    self.cache.set_max_age(max_age);
                }
                Reply::Limits(self.limits())
            }
            Command::Sleep { ms } => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Reply::Slept(SleptResponse { slept_ms: ms })
            }
            Command::Help => Reply::Help(HelpResponse {
                commands: USAGE.to_vec(),
            }),
            Command::Quit => return None,
        };

        Some(reply)
    }

    fn limits(&self) -> LimitsResponse {
        LimitsResponse {
            max_size: self.cache.max_size(),
            max_age_ms: self.cache.max_age().map(|age| age.as_millis()),
        }
    }
}
