// Copyright 2019-2020 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Logging setup using `tracing` + `tracing-subscriber`
//!
//! Logs go to stderr, stdout is reserved for the report. The level is taken from the `--log-level`
//! flag, then the `LAUNCHTIMES_LOG` environment variable, and defaults to `warn`.

use tracing::Level;

use crate::Error;

pub const LOG_ENV: &str = "LAUNCHTIMES_LOG";

/// Accepted values for the log level
pub const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Install the global subscriber, may only be called once
pub fn init_logging(cli_level: Option<&str>) -> Result<(), Error> {
    let level = cli_level
        .and_then(parse_level)
        .or_else(|| std::env::var(LOG_ENV).ok().as_deref().and_then(parse_level))
        .unwrap_or(Level::WARN);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::from(format!("failed to initialize logging: {}", e)))
}

pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("Debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" warning "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);

        for level in LEVELS {
            assert!(parse_level(level).is_some());
        }
    }
}
