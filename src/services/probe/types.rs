use reqwest::StatusCode;

/// Why the last attempt of a ping failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeFailure {
    #[error("ping failed with status code: {0}")]
    Status(StatusCode),
    #[error("error pinging server: {0}")]
    Transport(String),
}

/// Result of one ping cycle, possibly spanning several attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { attempts: u32 },
    Failure(ProbeFailure),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
