//! Diagnostic logging on stderr.
//!
//! User-facing progress goes to stdout through `colored`; internal events
//! from the engine and the CLI go through `tracing`.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV: &str = "ZODCAST_LOG";

/// Filter used when `ZODCAST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "zodcast=debug,zodcast_cli=debug"
    } else {
        "zodcast=warn,zodcast_cli=warn"
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert!(default_directive(true).contains("debug"));
        assert!(default_directive(false).contains("warn"));
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
