//! DeskPilot - desktop automation from natural-language task descriptions.
//!
//! Main entry point: runs one task and prints its result.

mod adapters;
mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deskpilot_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use deskpilot_core::{Engine, TaskResult};

use crate::cli::Cli;

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr so stdout carries only the result. Log
/// files are written to ~/.deskpilot/logs/ with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let file_layer = if logging.file {
        let log_dir = adapters::deskpilot_dir().join("logs");
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("deskpilot")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keep the writer alive for the whole process.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(file_layer)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        eprintln!("config warning: {}: {}", warning.path, warning.message);
    }
    if let Some(err) = validation.into_error() {
        return Err(err).context("Invalid configuration");
    }

    Ok(config)
}

fn print_result(result: &TaskResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        println!("{}", result.details);
    } else {
        println!("Error: {}", result.details);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_tracing(&config.logging)?;

    info!("Starting DeskPilot v{}", env!("CARGO_PKG_VERSION"));

    let capabilities = adapters::capabilities(&config, cli.work_dir.clone());
    let engine = Engine::builder()
        .config(config)
        .capabilities(capabilities)
        .build();

    let task = engine.create_task(cli.description());
    info!(domain = %task.domain(), "Executing task");

    let result = task.execute().await;
    if !result.success {
        warn!(details = %result.details, "Task failed");
    }

    print_result(&result, cli.json)?;

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
