use clap::Parser;
use pingwatch::config::{load_dotenv, Settings};
use pingwatch::services::lifecycle::{serve_local_target, shutdown_signal, LifecycleCoordinator};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pingwatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        tracing::error!("Error reading .env file: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = Settings::parse();

    if settings.local {
        return match serve_local_target(settings.local_port, shutdown_signal()).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match settings.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Environment validation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        target_url = %config.target_url,
        interval_ms = config.interval.as_millis() as u64,
        max_retries = config.max_retries,
        max_consecutive_failures = config.max_consecutive_failures,
        "Starting {}",
        config.service_name
    );

    let coordinator = match LifecycleCoordinator::bind(config).await {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match coordinator.run().await {
        Ok(reason) => {
            tracing::info!("Stopped: {:?}", reason);
            ExitCode::from(reason.exit_code())
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
