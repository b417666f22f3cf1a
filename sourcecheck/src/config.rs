//! Configuration helpers via environment variables
//!
//! Most settings are read by clap (`env = ...` on each argument). The helpers
//! here cover values that are consulted outside of argument parsing, such as
//! the log filter.

/// Environment variable for the log filter
pub const LOG_LEVEL_ENV: &str = "SOURCECHECK_LOG_LEVEL";

/// Default log filter when nothing is configured
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Get an environment variable, falling back to a second name
///
/// Empty values are treated as unset.
///
/// # Example
/// ```
/// use sourcecheck::config::get_env_with_fallback;
///
/// let filter = get_env_with_fallback("SOURCECHECK_LOG_LEVEL", "RUST_LOG");
/// ```
pub fn get_env_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(primary: &str, fallback: &str, default: &str) -> String {
    get_env_with_fallback(primary, fallback).unwrap_or_else(|| default.to_string())
}

/// ログフィルタ文字列を取得
///
/// `SOURCECHECK_LOG_LEVEL` → `RUST_LOG` → `warn` の順に解決する。
pub fn log_filter() -> String {
    get_env_with_fallback_or(LOG_LEVEL_ENV, "RUST_LOG", DEFAULT_LOG_FILTER)
}
