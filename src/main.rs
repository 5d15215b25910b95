//! Evict Cache shell
//!
//! Drives an in-memory LRU/TTL cache from stdin, one command per line, and
//! prints one JSON reply per line on stdout.

use anyhow::Result;
use tokio::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evict_cache::shell::{self, Session};
use evict_cache::CacheOptions;

/// Main entry point for the cache shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load cache options from environment variables
/// 3. Run the command loop until EOF or `quit`
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evict_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = CacheOptions::from_env();
    info!(
        "Cache options loaded: max_size={:?}, max_age={:?}",
        options.max_size, options.max_age
    );

    let mut session = Session::from_options(options);
    shell::run(&mut session, BufReader::new(io::stdin()), io::stdout()).await?;

    info!("Shell shutdown complete");
    Ok(())
}
