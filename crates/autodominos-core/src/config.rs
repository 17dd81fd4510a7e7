use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.dominospizza.es/";
pub const DEFAULT_USER_AGENT: &str = "AutoDominos/2.0";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
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
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("AUTODOMINOS_BASE_URL", DEFAULT_BASE_URL);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "AUTODOMINOS_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" is not an http(s) URL"),
        });
    }

    let user_agent = or_default("AUTODOMINOS_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64("AUTODOMINOS_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("AUTODOMINOS_MAX_RETRIES", "5")?;
    if max_retries == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AUTODOMINOS_MAX_RETRIES".to_string(),
            reason: "must allow at least one attempt".to_string(),
        });
    }
    let retry_backoff_base_ms = parse_u64("AUTODOMINOS_RETRY_BACKOFF_BASE_MS", "0")?;

    let codes_path = PathBuf::from(or_default("AUTODOMINOS_CODES_PATH", "./data/codes.txt"));
    let locations_path = PathBuf::from(or_default(
        "AUTODOMINOS_LOCATIONS_PATH",
        "./data/provinces-cities-ids.json",
    ));
    let addresses_path = PathBuf::from(or_default(
        "AUTODOMINOS_ADDRESSES_PATH",
        "./config/addresses.yaml",
    ));
    let reports_dir = PathBuf::from(or_default("AUTODOMINOS_REPORTS_DIR", "./reports"));
    let log_level = or_default("AUTODOMINOS_LOG_LEVEL", "info");

    Ok(AppConfig {
        base_url,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        codes_path,
        locations_path,
        addresses_path,
        reports_dir,
        log_level,
    })
}
