use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::services::monitor::{Decision, FailureTracker, MonitorState};
use crate::services::probe::{Probe, ProbeExecutor, ProbeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopping,
    Stopped,
}

/// Why the poll loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Cancelled from outside (interrupt or coordinator shutdown)
    Cancelled,
    /// Stopped itself after too many consecutive failed pings
    ThresholdReached { failures: u32 },
}

/// Periodic ping loop
///
/// Runs one ping per tick, at most one in flight. Missed ticks are delayed,
/// never queued, so a slow ping just pushes the next one back.
pub struct MonitorEngine<P = ProbeExecutor> {
    prober: P,
    tracker: FailureTracker,
    state: Arc<MonitorState>,
    interval: Duration,
    loop_state: LoopState,
}

impl MonitorEngine {
    pub fn new(config: &Config, state: Arc<MonitorState>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_prober(
            ProbeExecutor::new(config, state.clone())?,
            config,
            state,
        ))
    }
}

impl<P: Probe> MonitorEngine<P> {
    /// Loop over any `Probe`; the scheduling only depends on its outcomes
    pub fn with_prober(prober: P, config: &Config, state: Arc<MonitorState>) -> Self {
        Self {
            prober,
            tracker: FailureTracker::new(config.max_consecutive_failures),
            state,
            interval: config.interval,
            loop_state: LoopState::Running,
        }
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Start the background polling loop
    /// Consumes the engine: `Stopped` is reached exactly once.
    pub async fn run(mut self, cancel: CancellationToken) -> LoopExit {
        tracing::info!(
            "Ping routine started (interval {:?}, threshold {} failures)",
            self.interval,
            self.tracker.threshold()
        );

        // First ping one interval after start
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let exit = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break LoopExit::Cancelled,
                _ = ticker.tick() => {}
            }

            let outcome = match self.prober.probe(&cancel).await {
                Some(outcome) => outcome,
                None => break LoopExit::Cancelled,
            };

            if let Some(exit) = self.apply(&outcome) {
                break exit;
            }
        };

        self.loop_state = LoopState::Stopped;
        match exit {
            LoopExit::Cancelled => tracing::info!("Received shutdown signal, ping routine stopped"),
            LoopExit::ThresholdReached { failures } => tracing::info!(
                "Ping routine stopped after {} consecutive failures",
                failures
            ),
        }
        exit
    }

    /// Commit one outcome to the tracker and the shared state
    fn apply(&mut self, outcome: &ProbeOutcome) -> Option<LoopExit> {
        let decision = self.tracker.on_outcome(outcome);
        let failures = self.tracker.consecutive_failures();
        self.state.set_consecutive_failures(failures);

        match decision {
            Decision::Continue => None,
            Decision::ShutdownThresholdReached => {
                self.loop_state = LoopState::Stopping;
                tracing::error!(
                    "Stopping ping routine after {} consecutive complete failures, initiating automatic shutdown",
                    failures
                );
                Some(LoopExit::ThresholdReached { failures })
            }
        }
    }
}
