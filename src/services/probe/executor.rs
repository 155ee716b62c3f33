use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::services::monitor::MonitorState;
use crate::services::probe::{Probe, ProbeFailure, ProbeOutcome};

const USER_AGENT: &str = concat!("pingwatch/", env!("CARGO_PKG_VERSION"));

/// Performs one ping cycle: GET the target with retries, then the self-check
pub struct ProbeExecutor {
    client: Client,
    state: Arc<MonitorState>,
    target_url: Url,
    headers: HeaderMap,
    self_url: Option<Url>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl ProbeExecutor {
    pub fn new(config: &Config, state: Arc<MonitorState>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            state,
            target_url: config.target_url.clone(),
            headers: config.headers.clone(),
            self_url: config.self_url.clone(),
            max_retries: config.max_retries,
            retry_backoff: config.retry_backoff,
        })
    }

    async fn attempt(&self) -> Result<(), ProbeFailure> {
        let response = self
            .client
            .get(self.target_url.clone())
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| ProbeFailure::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ProbeFailure::Status(status)),
        }
    }

    /// Best-effort call to our own health endpoint, never retried
    async fn call_self_check(&self) {
        let Some(url) = &self.self_url else {
            tracing::debug!("Own URL not set, skipping self-check");
            return;
        };

        tracing::debug!("Calling own health check endpoint: {}", url);

        match self.client.get(url.clone()).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::info!("Own health check successful");
            }
            Ok(response) => {
                tracing::warn!(
                    "Own health check failed with status code: {}",
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!("Error calling own health check: {}", e);
            }
        }
    }
}

#[async_trait]
impl Probe for ProbeExecutor {
    /// Ping the target, retrying with a flat backoff
    ///
    /// Returns `None` when `cancel` fires before the cycle completes. An attempt
    /// that is already in flight is allowed to finish first.
    async fn probe(&self, cancel: &CancellationToken) -> Option<ProbeOutcome> {
        tracing::info!("Pinging server: {}", self.target_url);

        let mut last_failure = ProbeFailure::Transport("no attempt was made".to_string());

        for attempt in 1..=self.max_retries {
            if cancel.is_cancelled() {
                return None;
            }

            tracing::debug!("Attempt {} of {}", attempt, self.max_retries);

            match self.attempt().await {
                Ok(()) => {
                    self.state.record_success();
                    tracing::info!("✅ Ping successful to {} (attempt {})", self.target_url, attempt);
                    // Our own listener is already draining once shutdown starts
                    if !cancel.is_cancelled() {
                        self.call_self_check().await;
                    }
                    return Some(ProbeOutcome::Success { attempts: attempt });
                }
                Err(failure) => {
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        "{}",
                        failure
                    );
                    last_failure = failure;
                }
            }

            if attempt < self.max_retries {
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = tokio::time::sleep(self.retry_backoff) => {}
                }
            }
        }

        tracing::error!("Max retries reached, giving up on {}", self.target_url);
        Some(ProbeOutcome::Failure(last_failure))
    }
}
