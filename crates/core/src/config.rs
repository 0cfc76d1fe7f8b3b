use std::time::Duration;

pub const API_URL_ENV: &str = "SMART_CONTENT_API_URL";
pub const TIMEOUT_ENV: &str = "SMART_CONTENT_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const FULL_ANALYSIS_PATH: &str = "/api/full-analysis";
pub const TRANSCRIBE_PATH: &str = "/transcribe";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{env_var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { env_var: &'static str, value: String },

    #[error("{env_var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { env_var: &'static str, value: String },
}

/// Where the analysis service lives and how long a single call may take.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    /// `None` means a call may hang forever.
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(API_URL_ENV, &base_url.into())?,
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(API_URL_ENV) {
            Some(raw) => normalize_base_url(API_URL_ENV, &raw)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => parse_timeout_secs(TIMEOUT_ENV, &raw)?,
            None => Some(DEFAULT_TIMEOUT),
        };

        Ok(Self { base_url, timeout })
    }

    pub fn full_analysis_url(&self) -> String {
        format!("{}{}", self.base_url, FULL_ANALYSIS_PATH)
    }

    pub fn transcribe_url(&self) -> String {
        format!("{}{}", self.base_url, TRANSCRIBE_PATH)
    }
}

/// `0` disables the timeout.
pub fn parse_timeout_secs(
    env_var: &'static str,
    raw: &str,
) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout {
            env_var,
            value: raw.to_string(),
        })?;

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn normalize_base_url(env_var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            env_var,
            value: raw.to_string(),
        });
    }
    Ok(url.to_string())
}
