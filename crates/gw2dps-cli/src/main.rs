mod alert;
mod cli;
mod commands;
mod display;
mod input;
mod shutdown;

use anyhow::Result;
use clap::Parser;
use gw2dps_core::{MeterConfig, MeterConfigBuilder};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    // stdout belongs to the display
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gw2dps=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command_or_default() {
        Command::Track { json } => {
            info!("gw2dps {}", env!("CARGO_PKG_VERSION"));
            commands::tracking::run(&config, json)
        }
        Command::Probe => commands::probe::run(&config),
        Command::Trail {
            base,
            offsets,
            float,
            absolute,
        } => commands::trail::run(&config, &base, &offsets, float, absolute),
        Command::Config { output } => commands::config::run(&config, output.as_deref()),
    }
}

/// File values over defaults, command line flags over both
fn load_config(cli: &Cli) -> Result<MeterConfig> {
    let file = match MeterConfig::load(&cli.config) {
        Ok(config) => {
            info!("Loaded config from {}", cli.config.display());
            config
        }
        Err(e) if e.is_not_found() => {
            debug!("Config file {} not found, using defaults", cli.config.display());
            MeterConfig::default()
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            MeterConfig::default()
        }
    };

    let mut builder = MeterConfigBuilder::from_config(file);
    if let Some(tick_ms) = cli.tick_ms {
        builder = builder.tick_ms(tick_ms);
    }
    Ok(builder.build()?)
}
