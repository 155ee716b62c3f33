use crate::services::probe::ProbeOutcome;

/// What the poll loop should do after a ping cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    ShutdownThresholdReached,
}

/// Counts back-to-back failed pings against the shutdown threshold
///
/// Pure accounting, no I/O. Owned by the poll loop, which is the only writer.
#[derive(Debug)]
pub struct FailureTracker {
    consecutive_failures: u32,
    threshold: u32,
}

impl FailureTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            threshold,
        }
    }

    pub fn on_outcome(&mut self, outcome: &ProbeOutcome) -> Decision {
        if outcome.is_success() {
            self.consecutive_failures = 0;
            return Decision::Continue;
        }

        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.threshold {
            Decision::ShutdownThresholdReached
        } else {
            Decision::Continue
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
