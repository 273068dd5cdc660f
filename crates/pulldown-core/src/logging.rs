//! Logging bootstrap built on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Stable target every diagnostic of the card is emitted under.
///
/// Hosts filter on it (`RUST_LOG=pulldown_card=debug`) to isolate drawer
/// diagnostics from the rest of their logs.
pub const LOG_TARGET: &str = "pulldown_card";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,pulldown_card=debug";

/// Install a global fmt subscriber.
///
/// Honors `RUST_LOG` when present. Calling this twice is harmless: the
/// second installation attempt is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::trace!(target: LOG_TARGET, "global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init();
        init();
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
