//! Command and reply models for the cache shell
//!
//! Commands are parsed from stdin lines; replies are written back as JSON.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{Command, USAGE};
pub use responses::{
    DeleteResponse, ErrorResponse, GetResponse, HelpResponse, LimitsResponse, ListResponse, Reply,
    SetResponse, SizeResponse, SleptResponse, StatsResponse,
};
