//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gw2dps_core::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "gw2dps")]
#[command(about = "Guild Wars 2 damage meter", version)]
pub struct Cli {
    /// Configuration file (TOML); missing files mean built-in defaults
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        env = "GW2DPS_CONFIG"
    )]
    pub config: PathBuf,

    /// Tick interval in milliseconds, overriding the configuration
    #[arg(long, global = true)]
    pub tick_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Attach to the game and show damage rates (default)
    Track {
        /// Print one JSON object per tick instead of the console display
        #[arg(long)]
        json: bool,
    },
    /// Show how every configured target trail and combat flag resolves right now
    Probe,
    /// Resolve a single pointer trail once
    Trail {
        /// Trail base address (hex)
        #[arg(short, long)]
        base: String,
        /// Comma-separated offsets, e.g. "0x34, 0x150, 0x8"
        #[arg(short, long, allow_hyphen_values = true)]
        offsets: String,
        /// Read the final value as f32 instead of i32
        #[arg(long)]
        float: bool,
        /// Treat the base as absolute instead of relative to the image base
        #[arg(long)]
        absolute: bool,
    },
    /// Print the effective configuration, or write it to a file
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// The subcommand to run, `track` when none was given
    pub fn command_or_default(&self) -> Command {
        match &self.command {
            Some(command) => command.clone(),
            None => Command::Track { json: false },
        }
    }
}
