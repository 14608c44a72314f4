use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_RELAY_URL: &str = "https://api.scraperapi.com/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("RACKSTAT_ENV", "development"))?;
    let bind_addr = parse_value(
        "RACKSTAT_BIND_ADDR",
        &or_default("RACKSTAT_BIND_ADDR", "0.0.0.0:3000"),
    )?;
    let log_level = or_default("RACKSTAT_LOG_LEVEL", "info");

    let fetch_timeout_secs = parse_value(
        "RACKSTAT_FETCH_TIMEOUT_SECS",
        &or_default("RACKSTAT_FETCH_TIMEOUT_SECS", "20"),
    )?;
    let fetch_max_attempts: u32 = parse_value(
        "RACKSTAT_FETCH_MAX_ATTEMPTS",
        &or_default("RACKSTAT_FETCH_MAX_ATTEMPTS", "3"),
    )?;
    if fetch_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RACKSTAT_FETCH_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let backoff_step_ms = parse_value(
        "RACKSTAT_BACKOFF_STEP_MS",
        &or_default("RACKSTAT_BACKOFF_STEP_MS", "1000"),
    )?;
    let backoff_jitter_ms = parse_value(
        "RACKSTAT_BACKOFF_JITTER_MS",
        &or_default("RACKSTAT_BACKOFF_JITTER_MS", "2000"),
    )?;

    let rate_limit_max_requests = parse_value(
        "RACKSTAT_RATE_LIMIT_MAX_REQUESTS",
        &or_default("RACKSTAT_RATE_LIMIT_MAX_REQUESTS", "10"),
    )?;
    let rate_limit_window_secs = parse_value(
        "RACKSTAT_RATE_LIMIT_WINDOW_SECS",
        &or_default("RACKSTAT_RATE_LIMIT_WINDOW_SECS", "60"),
    )?;

    let relay_api_key = lookup("SCRAPER_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    let relay_url = or_default("RACKSTAT_RELAY_URL", DEFAULT_RELAY_URL);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        fetch_timeout_secs,
        fetch_max_attempts,
        backoff_step_ms,
        backoff_jitter_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
        relay_api_key,
        relay_url,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RACKSTAT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
