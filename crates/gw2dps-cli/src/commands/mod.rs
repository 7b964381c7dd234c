//! CLI command implementations.

pub mod config;
pub mod hex_utils;
pub mod probe;
pub mod tracking;
pub mod trail;

use anyhow::{Result, bail};
use gw2dps_core::ProcessHandle;
use tracing::{error, info};

use crate::alert;

/// Open the game process or tell the user why not.
///
/// There is no retry: the meter is started once the game runs.
pub fn attach(image_name: &str) -> Result<ProcessHandle> {
    match ProcessHandle::find_and_open(image_name) {
        Ok(process) => {
            info!(
                "Attached to {} (pid {}, base {:#x})",
                image_name, process.pid, process.base_address
            );
            Ok(process)
        }
        Err(e) => {
            error!("Failed to attach to {}: {}", image_name, e);
            alert::process_unavailable(image_name, &e.to_string());
            bail!("{} is not available", image_name)
        }
    }
}
