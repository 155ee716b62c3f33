use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use std::time::Duration;

/// How long a successful probe keeps the agent healthy
pub const STALENESS_WINDOW: Duration = Duration::from_secs(15 * 60);

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SERVICE_NAME: &str = "pingwatch";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    #[error("Invalid header {0:?}: {1}")]
    InvalidHeader(String, String),
}

/// Validated monitor configuration, built once before the poll loop starts
#[derive(Debug, Clone)]
pub struct Config {
    // Probe target
    pub target_url: Url,
    pub headers: HeaderMap,

    // Self-check, `None` disables it
    pub self_url: Option<Url>,

    // Scheduling
    pub interval: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub request_timeout: Duration,
    pub max_consecutive_failures: u32,

    // Health listener
    pub port: u16,
    pub shutdown_grace: Duration,
    pub service_name: String,
}

impl Config {
    /// Config with default settings probing `target_url`
    pub fn new(target_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            target_url: parse_url("target URL", target_url)?,
            headers: HeaderMap::new(),
            self_url: None,
            interval: DEFAULT_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            port: DEFAULT_PORT,
            shutdown_grace: Duration::from_secs(5),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        })
    }

    /// Set the self-check URL; an empty string disables the self-check
    pub fn with_self_url(mut self, self_url: &str) -> Result<Self, ConfigError> {
        self.self_url = if self_url.trim().is_empty() {
            None
        } else {
            Some(parse_url("own URL", self_url)?)
        };
        Ok(self)
    }

    /// Attach a header sent with every probe request
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let header_name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| ConfigError::InvalidHeader(name.to_string(), e.to_string()))?;
        let header_value = HeaderValue::from_str(value.trim())
            .map_err(|e| ConfigError::InvalidHeader(name.to_string(), e.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Check the numeric invariants the poll loop relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::NotPositive("PING_INTERVAL"));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::NotPositive("MAX_RETRIES"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(ConfigError::NotPositive("MAX_CONSECUTIVE_FAILS"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::NotPositive("REQUEST_TIMEOUT"));
        }
        Ok(())
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::Missing(field));
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
