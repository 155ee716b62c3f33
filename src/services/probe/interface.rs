use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ProbeOutcome;

/// One ping cycle as seen by the poll loop
#[async_trait]
pub trait Probe: Send + Sync {
    /// `None` when `cancel` fired before the cycle completed
    async fn probe(&self, cancel: &CancellationToken) -> Option<ProbeOutcome>;
}
