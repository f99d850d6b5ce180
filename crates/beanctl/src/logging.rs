//! Diagnostic logging for beanctl
//!
//! Logs go to stderr so reports on stdout stay machine-readable. The filter
//! comes from $BEAN_LOG (tracing `EnvFilter` syntax), defaulting to `warn`,
//! or `debug` with `--verbose`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "BEAN_LOG";

/// Default filter directive
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
