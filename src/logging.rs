//! Logger bootstrap for the demo binary and tests.
//!
//! Gameplay logs under the `bookbound` target; engine crates are kept at
//! `warn` so frame-by-frame engine chatter does not drown out mode switches,
//! grabs and room changes.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter directive for the given verbosity.
///
/// # Examples
///
/// ```
/// use bookbound::logging::default_filter;
/// assert_eq!(default_filter(false), "warn,bookbound=info");
/// assert_eq!(default_filter(true), "warn,bookbound=debug");
/// ```
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let gameplay = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!(
        "{},{}={}",
        LevelFilter::Warn.as_str().to_lowercase(),
        env!("CARGO_CRATE_NAME"),
        gameplay.as_str().to_lowercase()
    )
}

/// Initializes the global logger.
///
/// `verbose` lowers gameplay logging to `debug`. `RUST_LOG` still takes
/// precedence over both defaults.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis().format_target(true);

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, "info")]
    #[case(true, "debug")]
    fn verbosity_only_changes_gameplay_level(#[case] verbose: bool, #[case] level: &str) {
        let filter = default_filter(verbose);
        assert!(filter.starts_with("warn,"));
        assert!(filter.ends_with(&format!("bookbound={level}")));
    }

    #[test]
    fn init_is_idempotent() {
        init(false);
        init(true);
        log::debug!("logger survives double initialisation");
    }
}
