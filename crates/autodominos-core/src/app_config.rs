use std::path::PathBuf;

/// Runtime configuration for a probing run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of the target site; every endpoint path is joined onto it.
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Total attempts per request before giving up.
    pub max_retries: u32,
    /// Base delay for exponential back-off between attempts; `0` retries immediately.
    pub retry_backoff_base_ms: u64,
    pub codes_path: PathBuf,
    pub locations_path: PathBuf,
    pub addresses_path: PathBuf,
    pub reports_dir: PathBuf,
    pub log_level: String,
}
