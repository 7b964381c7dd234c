//! Probe command implementation.
//!
//! Shows what the tracker would see right now: every target trail with the
//! reason it is used or skipped, and both combat cells.

use anyhow::Result;
use gw2dps_core::{CandidateProbe, CombatStateTracker, MemoryReader, MeterConfig, TargetLocator};

use super::attach;
use super::hex_utils::{format_hex_address, format_optional_address, format_scalar};

pub fn run(config: &MeterConfig) -> Result<()> {
    let process = attach(&config.process.image_name)?;
    let reader = MemoryReader::new(&process);

    let locator = TargetLocator::new(config.candidates(process.base_address));
    let probes = locator.inspect(&reader);
    let selected = probes.iter().position(CandidateProbe::is_accepted);

    println!("=== Target Trails ===");
    println!(
        "{:<3} {:<12} {:<12} {:<12} {:<14} {:<12} Verdict",
        "#", "Kind", "Base", "Address", "Current", "Max"
    );
    for (i, (probe, candidate)) in probes.iter().zip(locator.candidates()).enumerate() {
        let marker = if Some(i) == selected { "*" } else { " " };
        println!(
            "{}{:<2} {:<12} {:<12} {:<12} {:<14} {:<12} {}",
            marker,
            i,
            probe.kind.to_string(),
            format_hex_address(probe.base),
            format_optional_address(probe.trail.address),
            format_scalar(probe.trail.value),
            probe
                .max
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            probe.verdict
        );
        println!("    offsets [{}]", candidate.offsets);
    }
    if selected.is_none() {
        println!("No target selected");
    }

    let combat = CombatStateTracker::new(&config.combat);
    let flags = combat.read_flags(&reader);
    println!();
    println!("=== Combat ===");
    println!(
        "Flag     {}: {}",
        format_hex_address(config.combat.flag_address),
        flags
            .flag
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unreadable".to_string())
    );
    println!(
        "Sentinel {}: {}",
        format_hex_address(config.combat.sentinel_address),
        flags
            .sentinel
            .map(|v| format!("{} (expect {})", v, config.combat.sentinel_pattern))
            .unwrap_or_else(|| "unreadable".to_string())
    );
    println!(
        "In combat: {}",
        flags.in_combat(config.combat.sentinel_pattern)
    );

    Ok(())
}
