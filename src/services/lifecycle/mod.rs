pub mod coordinator;
pub mod local;
pub mod signal;

pub use coordinator::{LifecycleCoordinator, ShutdownReason};
pub use local::serve_local_target;
pub use signal::shutdown_signal;

use std::net::SocketAddr;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(std::io::Error),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Background task failed: {0}")]
    TaskFailed(String),
}
