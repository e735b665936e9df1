use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, ScraperConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Separator for `PRODCAT_USER_AGENTS`. User-Agent strings contain commas and
/// semicolons, so neither can delimit the pool.
const USER_AGENT_SEPARATOR: char = '|';

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
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
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = ScraperConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_value(var, &or_default(var, default))
    };

    let parse_optional = |var: &str| -> Result<Option<usize>, ConfigError> {
        match lookup(var) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => parse_value(var, &raw).map(Some),
            Err(_) => Ok(None),
        }
    };

    let base_url = or_default("PRODCAT_BASE_URL", &defaults.base_url)
        .trim_end_matches('/')
        .to_owned();
    let api_url = or_default("PRODCAT_API_URL", &defaults.api_url);
    let city_id = or_default("PRODCAT_CITY_ID", &defaults.city_id);

    let request_timeout_secs = parse_num("PRODCAT_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRODCAT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_attempts: u32 = parse_value(
        "PRODCAT_MAX_ATTEMPTS",
        &or_default("PRODCAT_MAX_ATTEMPTS", "3"),
    )?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRODCAT_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let backoff_min_secs = parse_seconds(
        "PRODCAT_BACKOFF_MIN_SECS",
        &or_default("PRODCAT_BACKOFF_MIN_SECS", "10"),
    )?;
    let backoff_max_secs = parse_seconds(
        "PRODCAT_BACKOFF_MAX_SECS",
        &or_default("PRODCAT_BACKOFF_MAX_SECS", "20"),
    )?;
    if backoff_max_secs < backoff_min_secs {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRODCAT_BACKOFF_MAX_SECS".to_string(),
            reason: format!("{backoff_max_secs} is below PRODCAT_BACKOFF_MIN_SECS ({backoff_min_secs})"),
        });
    }

    let max_items = parse_optional("PRODCAT_MAX_ITEMS")?;
    let max_pages = parse_optional("PRODCAT_MAX_PAGES")?;
    let fetch_details = parse_bool(
        "PRODCAT_FETCH_DETAILS",
        &or_default("PRODCAT_FETCH_DETAILS", "true"),
    )?;

    let user_agents = parse_user_agents(&or_default("PRODCAT_USER_AGENTS", DEFAULT_USER_AGENT));

    let output_path = PathBuf::from(or_default("PRODCAT_OUTPUT_PATH", "output/products.csv"));
    let log_level = or_default("PRODCAT_LOG_LEVEL", "info");

    Ok(AppConfig {
        scraper: ScraperConfig {
            base_url,
            api_url,
            city_id,
            request_timeout_secs,
            max_attempts,
            backoff_min_secs,
            backoff_max_secs,
            max_items,
            max_pages,
            fetch_details,
            user_agents,
        },
        output_path,
        log_level,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_seconds(var: &str, raw: &str) -> Result<f64, ConfigError> {
    let secs: f64 = parse_value(var, raw)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a non-negative number of seconds, got {raw}"),
        });
    }
    Ok(secs)
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

/// Split the `|`-separated pool, dropping blanks. An empty pool falls back to
/// the built-in Firefox agent so header selection always has a candidate.
fn parse_user_agents(raw: &str) -> Vec<String> {
    let pool: Vec<String> = raw
        .split(USER_AGENT_SEPARATOR)
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(str::to_owned)
        .collect();
    if pool.is_empty() {
        vec![DEFAULT_USER_AGENT.to_owned()]
    } else {
        pool
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
