//! Background Tasks Module
//!
//! Contains the timer tasks that run alongside the cache.
//!
//! # Tasks
//! - Expiry: Removes a key once its sliding TTL elapses

mod expiry;

pub use expiry::{spawn_expiry_task, timers_enabled, ExpiryTimer};
