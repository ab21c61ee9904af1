use std::path::PathBuf;

use directories::ProjectDirs;
use gamesdk_core::config::Settings;
use thiserror::Error;
use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Directory holding the SDK's rolling log files.
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "gamesdk", "gamesdk")
        .map(|d| d.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install a console + daily-rolling file subscriber for a host application.
///
/// `RUST_LOG` wins over `settings.log_level`. The SDK never calls this
/// itself, and a host that already installed its own subscriber gets
/// [`TelemetryError::AlreadyInstalled`] back instead of a second one.
/// Keep the returned guard alive so buffered lines are flushed.
pub fn init_subscriber(name: &str, settings: &Settings) -> Result<WorkerGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));

    let file_appender = tracing_appender::rolling::daily(log_dir(), format!("{}.log", name));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_target(false).pretty())
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking));

    set_global_default(subscriber)?;

    // Hosts may already route `log` records elsewhere; keep theirs.
    if LogTracer::init().is_err() {
        tracing::debug!("log bridge already installed, leaving it in place");
    }

    Ok(guard)
}
