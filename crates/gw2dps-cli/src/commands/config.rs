//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use gw2dps_core::MeterConfig;

/// Print the effective configuration, or write it to `output`
pub fn run(config: &MeterConfig, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
