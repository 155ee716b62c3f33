use chrono::{DateTime, Utc};

use crate::config::STALENESS_WINDOW;

/// Health of the agent as reported by GET /health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// No ping has succeeded since start
    NeverSucceeded,
    /// Last successful ping is older than the staleness window
    Stale,
}

impl HealthStatus {
    /// Why the agent is unhealthy, sent as the 503 body
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Healthy => None,
            Self::NeverSucceeded => Some("No successful pings yet"),
            Self::Stale => Some("Last successful ping was too long ago"),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

pub fn evaluate(last_success: Option<DateTime<Utc>>, now: DateTime<Utc>) -> HealthStatus {
    let Some(last_success) = last_success else {
        return HealthStatus::NeverSucceeded;
    };

    // A timestamp ahead of `now` (clock step) has no age yet
    match (now - last_success).to_std() {
        Ok(age) if age > STALENESS_WINDOW => HealthStatus::Stale,
        _ => HealthStatus::Healthy,
    }
}

pub fn is_healthy(last_success: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    evaluate(last_success, now).is_healthy()
}
