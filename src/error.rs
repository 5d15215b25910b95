//! Error types for the cache crate
//!
//! Cache operations never fail; errors only arise where text is parsed into
//! options or shell commands.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate's parsing boundaries.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Options document is not valid JSON or not a JSON object
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Shell input line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
