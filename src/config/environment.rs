use clap::Parser;
use std::time::Duration;

use super::monitor::{
    Config, ConfigError, DEFAULT_INTERVAL, DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_MAX_RETRIES,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_BACKOFF, DEFAULT_SERVICE_NAME,
};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081/health";
pub const DEFAULT_OWN_URL: &str = "http://localhost:8080/health";

/// Command line settings
/// Every flag falls back to its environment variable, then to the default.
/// Call `load_dotenv` first so values from `.env` are visible.
#[derive(Debug, Clone, Parser)]
#[command(name = "pingwatch", version, about = "Liveness agent that pings a server and reports its own health")]
pub struct Settings {
    /// Server URL to ping
    #[arg(long, env = "SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Own health check URL, called after every successful ping
    #[arg(long, env = "OWN_URL", default_value = DEFAULT_OWN_URL)]
    pub own_url: String,

    /// Skip the own health check call
    #[arg(long)]
    pub no_self_check: bool,

    /// Ping interval in milliseconds
    #[arg(long, env = "PING_INTERVAL", default_value_t = DEFAULT_INTERVAL.as_millis() as u64)]
    pub ping_interval: u64,

    /// Maximum attempts per ping
    #[arg(long, env = "MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Consecutive failed pings before the agent shuts itself down
    #[arg(long, env = "MAX_CONSECUTIVE_FAILS", default_value_t = DEFAULT_MAX_CONSECUTIVE_FAILURES)]
    pub max_consecutive_fails: u32,

    /// Port for the /health endpoint
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Extra header sent with every ping, as "Name: value"
    /// Repeat the flag for more headers; `PING_HEADERS` takes one per line.
    #[arg(
        long = "header",
        env = "PING_HEADERS",
        value_delimiter = '\n',
        value_parser = parse_header
    )]
    pub headers: Vec<(String, String)>,

    /// Timeout for each outbound request in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_millis() as u64)]
    pub request_timeout: u64,

    /// Delay between attempts of one ping in milliseconds
    #[arg(long, env = "RETRY_BACKOFF", default_value_t = DEFAULT_RETRY_BACKOFF.as_millis() as u64)]
    pub retry_backoff: u64,

    /// Name reported by the /health endpoint
    #[arg(long, env = "SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME)]
    pub service_name: String,

    /// Run a local test server instead of the agent
    #[arg(long)]
    pub local: bool,

    /// Port for the local test server
    #[arg(long, env = "LOCAL_PORT", default_value_t = 8081)]
    pub local_port: u16,
}

impl Settings {
    /// Convert raw settings into a validated monitor config
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let own_url = if self.no_self_check { "" } else { &self.own_url };

        let mut config = Config::new(&self.server_url)?.with_self_url(own_url)?;
        for (name, value) in &self.headers {
            config = config.with_header(name, value)?;
        }

        config.interval = Duration::from_millis(self.ping_interval);
        config.max_retries = self.max_retries;
        config.max_consecutive_failures = self.max_consecutive_fails;
        config.port = self.port;
        config.request_timeout = Duration::from_millis(self.request_timeout);
        config.retry_backoff = Duration::from_millis(self.retry_backoff);
        config.service_name = self.service_name;

        config.validate()?;
        Ok(config)
    }
}

/// Load variables from `.env` if the file exists
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {:?}", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in {:?}", raw));
    }

    Ok((name.to_string(), value.trim().to_string()))
}
