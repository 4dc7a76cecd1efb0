use crate::config::LoggingConfig;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: one layer appends to the log file, one mirrors to stdout.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}

/// Installs the global Prometheus recorder and returns the handle `/metrics` renders from.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
