//! Logging initialization.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when neither `--log-level` nor `GHSTATS_LOG` is given.
pub fn default_level() -> &'static str {
    if cfg!(feature = "dev") {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber, writing compact lines to stderr.
///
/// An unparsable level falls back to `info`. Calling this twice is harmless.
pub fn init(level: Option<&str>) -> Result<()> {
    let level = level.unwrap_or(default_level());
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to parse log level")?;

    // stdout carries the headless summary
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .ok();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_accepts_bad_level_and_repeats() {
        assert!(init(Some("not a level[")).is_ok());
        assert!(init(Some("ghstats=debug")).is_ok());
        assert!(init(None).is_ok());
    }
}
