//! Structured logging with tracing.
//!
//! Logs go to stderr; stdout is reserved for the JSON result of the command.
//! The filter comes from `EXECLOCK_LOG` when set (standard `EnvFilter`
//! syntax), otherwise from the `-v` count.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "EXECLOCK_LOG";

/// Log level for this crate given the number of `-v` flags.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Default filter: dependencies at `warn`, this crate at the requested level.
pub fn default_directives(verbose: u8) -> String {
    format!("warn,execlock={}", level_for_verbosity(verbose))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
}
