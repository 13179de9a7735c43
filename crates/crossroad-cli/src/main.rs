//! crossroadctl - Crossroad Traffic Monitor console
//!
//! Reads operator commands from stdin, one per line, and applies them to an
//! in-process traffic monitor.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use crossroad_monitor::{MonitorConfig, TrafficMonitor};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::session::Session;

#[derive(Parser)]
#[command(name = "crossroadctl")]
#[command(about = "Crossroad Traffic Monitor - count vehicles, track camera faults")]
#[command(version)]
#[command(long_about = "
crossroadctl runs a crossroad traffic monitor and reads commands from stdin,
one per line (start, stop, reset, vehicle <category> <id>, fault, stats,
errors, state, help, quit). Statistics are cleared periodically.

Use --json for machine-readable statistics suitable for scripting.
")]
struct Cli {
    /// Periodic reset interval in milliseconds (overrides --config)
    #[arg(long, env = "CROSSROAD_PERIOD_MS")]
    period_ms: Option<u64>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output statistics in JSON format
    #[arg(long, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(path: Option<&Path>, period_ms: Option<u64>) -> Result<MonitorConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            serde_json::from_str::<MonitorConfig>(&text)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?
        }
        None => MonitorConfig::default(),
    };
    if let Some(period_ms) = period_ms {
        config.reset_period_ms = period_ms;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("crossroadctl={log_level},crossroad_monitor={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config(cli.config.as_deref(), cli.period_ms)?;
    tracing::debug!(reset_period_ms = config.reset_period_ms, "Monitor configured");

    let monitor = TrafficMonitor::new(config);
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();

    Session::new(&monitor, std::io::stdout().lock(), cli.json)
        .run(stdin.lock(), interactive)
        .context("console session failed")?;
    Ok(())
}
