//! Sensor Replay - Main Entry Point
//!
//! Loads a sensor CSV file, shows a diagnostic plot and min/max summary,
//! then replays every row to an MQTT broker.

use anyhow::Context;
use clap::Parser;
use sensor_replay::{
    backend::open_channel,
    config::CliArgs,
    dataset::{print_summary, summarize, Dataset},
    frontend::show_diagnostic_plot,
    session::{stop_on_ctrl_c, ReplayPublisher},
};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(args.log_file.as_deref())?;

    tracing::info!("Starting sensor replay");

    let config = args.resolve().context("Invalid configuration")?;
    let dataset = Dataset::load(config.input_path()?)?;

    if config.report.plot {
        show_diagnostic_plot(&dataset, &config.report)?;
    }

    print_summary(&summarize(&dataset, config.report.summary_fields.as_deref()));

    let channel = open_channel(&config, args.dry_run)?;
    let publisher = ReplayPublisher::new(channel, config.replay.clone());
    stop_on_ctrl_c(publisher.stop_handle())?;
    let report = publisher.run(dataset.records())?;

    tracing::info!("Shutting down: {}", report);
    Ok(())
}

/// Initialize logging: stderr always, plus a file when requested
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sensor_replay=debug"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}
