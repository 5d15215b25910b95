//! Shell Module
//!
//! Line-oriented command loop driving a cache session.
//!
//! # Commands
//! - `set <key> <value>` - Store a value
//! - `get <key>` - Look up a value (touches the key)
//! - `del <key>` - Remove a key
//! - `list` - Entries, most recently touched first
//! - `size` / `stats` - Counters
//! - `max-size [n]` / `max-age [ms]` - Read or change limits
//! - `sleep <ms>` - Wait, letting expiry timers run
//! - `quit` - End the session

pub mod handlers;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::models::{Command, ErrorResponse, Reply};

pub use handlers::Session;

/// Reads commands from `reader` until EOF or `quit`, writing one JSON reply
/// per line to `writer`. Blank lines are skipped.
pub async fn run<R, W>(session: &mut Session, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read command")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => match session.execute(command).await {
                Some(reply) => reply,
                None => break,
            },
            Err(err) => {
                warn!("{}", err);
                Reply::Error(ErrorResponse::new(err.to_string()))
            }
        };

        let mut out = serde_json::to_string(&reply).context("Failed to encode reply")?;
        out.push('\n');
        writer
            .write_all(out.as_bytes())
            .await
            .context("Failed to write reply")?;
        writer.flush().await.context("Failed to write reply")?;
    }

    info!("Session ended with {} entries", session.cache().len());
    Ok(())
}
