//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with output meant for `eval`.
//! `CLAUDE_PROFILE_LOG` takes an `EnvFilter` directive; `-v` raises the
//! default level from `warn` to `debug`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CLAUDE_PROFILE_LOG";

/// Filter built from `CLAUDE_PROFILE_LOG`, falling back to a verbosity-based level
pub fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::level_filters::LevelFilter;

    #[test]
    #[serial]
    fn test_default_levels() {
        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::remove_var(LOG_ENV) };
        assert_eq!(filter(false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(filter(true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    #[serial]
    fn test_env_directive_wins() {
        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::set_var(LOG_ENV, "claude_profile=trace") };
        assert_eq!(filter(false).max_level_hint(), Some(LevelFilter::TRACE));
        unsafe { std::env::remove_var(LOG_ENV) };
    }
}
