//! Environment variable parsing utilities
//!
//! Small helpers for reading typed settings from the environment with
//! defaults, so configuration code never has to unwrap.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// Missing and unparsable values both fall back to `default`.
///
/// # Example
/// ```ignore
/// let max: u32 = parse_env_with_default("DB_MAX_CONNECTIONS", 20);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Return the value of the first non-empty variable among `keys`
///
/// Used where a setting has a legacy name, e.g. `DATABASE_URL` with
/// `POSTGRES_URL` as fallback.
pub fn first_env_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}
