//! Shell commands
//!
//! Parses one line of shell input into a [`Command`].

use std::str::FromStr;

use crate::error::{CacheError, Result};

/// A single shell command.
///
/// Numeric arguments are kept as raw `f64` so the cache's own normalization
/// decides what counts as unbounded.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <key> <value...>`; the value is the rest of the line
    Set { key: String, value: String },
    /// `get <key>`
    Get { key: String },
    /// `del <key>`
    Del { key: String },
    /// `list`
    List,
    /// `size`
    Size,
    /// `stats`
    Stats,
    /// `max-size [n]`; without an argument, reports the current limits
    MaxSize(Option<f64>),
    /// `max-age [ms]`; without an argument, reports the current limits
    MaxAge(Option<f64>),
    /// `sleep <ms>`
    Sleep { ms: u64 },
    /// `help`
    Help,
    /// `quit` or `exit`
    Quit,
}

/// One-line usage summary per command.
pub const USAGE: &[&str] = &[
    "set <key> <value>",
    "get <key>",
    "del <key>",
    "list",
    "size",
    "stats",
    "max-size [n]",
    "max-age [ms]",
    "sleep <ms>",
    "help",
    "quit",
];

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| invalid("usage: set <key> <value>"))?;
                Ok(Command::Set {
                    key: key.to_string(),
                    value: value.trim_start().to_string(),
                })
            }
            "get" => Ok(Command::Get { key: single_key(rest, "get")? }),
            "del" => Ok(Command::Del { key: single_key(rest, "del")? }),
            "list" => Ok(Command::List),
            "size" => Ok(Command::Size),
            "stats" => Ok(Command::Stats),
            "max-size" => Ok(Command::MaxSize(optional_number(rest))),
            "max-age" => Ok(Command::MaxAge(optional_number(rest))),
            "sleep" => rest
                .parse()
                .map(|ms| Command::Sleep { ms })
                .map_err(|_| invalid("usage: sleep <ms>")),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(invalid("empty command")),
            other => Err(invalid(format!("unknown command '{}'", other))),
        }
    }
}

fn invalid(msg: impl Into<String>) -> CacheError {
    CacheError::InvalidCommand(msg.into())
}

fn single_key(rest: &str, name: &str) -> Result<String> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(invalid(format!("usage: {} <key>", name)));
    }
    Ok(rest.to_string())
}

/// Missing arguments mean "report"; unparsable ones become NaN so they
/// normalize to unbounded like any other invalid limit.
fn optional_number(rest: &str) -> Option<f64> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.parse().unwrap_or(f64::NAN))
    }
}
