use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use super::signal::shutdown_signal;
use super::MonitorError;
use crate::config::Config;
use crate::services::monitor::{LoopExit, MonitorEngine, MonitorState};
use crate::{create_app, AppState};

/// How the agent ended up stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM, or the caller's interrupt future
    Interrupted,
    /// The poll loop hit the consecutive-failure threshold
    FailureThreshold { failures: u32 },
}

impl ShutdownReason {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Interrupted => 0,
            Self::FailureThreshold { .. } => 2,
        }
    }
}

/// First event that ends the run
enum Trigger {
    Interrupt,
    PollLoop(Result<LoopExit, JoinError>),
    Listener(Result<io::Result<()>, JoinError>),
}

/// Runs the poll loop and the /health listener under one cancellation token
pub struct LifecycleCoordinator {
    config: Config,
    listener: TcpListener,
    state: Arc<MonitorState>,
}

impl LifecycleCoordinator {
    /// Validate the config and bind the health listener
    pub async fn bind(config: Config) -> Result<Self, MonitorError> {
        config.validate()?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| MonitorError::Bind { addr, source })?;

        Ok(Self {
            config,
            listener,
            state: Arc::new(MonitorState::new()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> Arc<MonitorState> {
        self.state.clone()
    }

    /// Run until SIGINT/SIGTERM or the failure threshold
    pub async fn run(self) -> Result<ShutdownReason, MonitorError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `interrupt` resolves or the failure threshold is reached
    ///
    /// Whichever comes first wins; the shared token is cancelled once and the
    /// other trigger is ignored from then on. The listener drains for at most
    /// `shutdown_grace` from that point.
    pub async fn run_until<F>(self, interrupt: F) -> Result<ShutdownReason, MonitorError>
    where
        F: Future<Output = ()> + Send,
    {
        let Self {
            config,
            listener,
            state,
        } = self;

        let engine = MonitorEngine::new(&config, state.clone())?;
        let app = create_app(Arc::new(AppState {
            monitor: state,
            service_name: config.service_name.clone(),
        }));

        match listener.local_addr() {
            Ok(addr) => tracing::info!("Health check endpoint available at http://{}/health", addr),
            Err(e) => tracing::warn!("Could not read listener address: {}", e),
        }

        let shutdown = CancellationToken::new();

        let server_shutdown = shutdown.clone();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
        });
        let mut poll = tokio::spawn(engine.run(shutdown.child_token()));

        tokio::pin!(interrupt);
        let trigger = tokio::select! {
            _ = &mut interrupt => Trigger::Interrupt,
            exit = &mut poll => Trigger::PollLoop(exit),
            served = &mut server => Trigger::Listener(served),
        };

        shutdown.cancel();

        let grace = config.shutdown_grace;
        let outcome = match trigger {
            Trigger::Interrupt => {
                tracing::info!("Received manual shutdown signal");
                // The grace period runs while an in-flight ping finishes
                let (stopped, ()) = tokio::join!(poll, drain_listener(server, grace));
                stopped
                    .map(|_| ShutdownReason::Interrupted)
                    .map_err(|e| MonitorError::TaskFailed(e.to_string()))
            }
            Trigger::PollLoop(exit) => {
                drain_listener(server, grace).await;
                match exit {
                    Ok(LoopExit::ThresholdReached { failures }) => {
                        tracing::warn!("Initiating automatic shutdown due to ping failures");
                        Ok(ShutdownReason::FailureThreshold { failures })
                    }
                    Ok(LoopExit::Cancelled) => Ok(ShutdownReason::Interrupted),
                    Err(e) => Err(MonitorError::TaskFailed(e.to_string())),
                }
            }
            Trigger::Listener(served) => {
                if let Err(e) = poll.await {
                    tracing::error!("Ping routine failed during shutdown: {}", e);
                }
                let err = match served {
                    Ok(Ok(())) => MonitorError::Serve(io::Error::other("listener stopped unexpectedly")),
                    Ok(Err(e)) => MonitorError::Serve(e),
                    Err(e) => MonitorError::TaskFailed(e.to_string()),
                };
                tracing::error!("Server error: {}", err);
                return Err(err);
            }
        };

        tracing::info!("Application shutdown complete");
        outcome
    }
}

/// Wait for in-flight requests up to `grace`, then give up on them
async fn drain_listener(mut server: JoinHandle<io::Result<()>>, grace: Duration) {
    tracing::info!("Shutting down server...");

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Server stopped"),
        Ok(Ok(Err(e))) => tracing::error!("Server shutdown error: {}", e),
        Ok(Err(e)) => tracing::error!("Server task failed: {}", e),
        Err(_) => {
            tracing::warn!("Server did not stop within {:?}, aborting", grace);
            server.abort();
        }
    }
}
