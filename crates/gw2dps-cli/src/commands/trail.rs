//! Trail command implementation.
//!
//! Resolves one pointer trail against the running game, hop by hop, to check
//! new offsets after a client update.

use anyhow::{Context, Result};
use gw2dps_core::{MemoryReader, MeterConfig, OffsetChain, ReadMemory, ScalarType, resolve};

use super::attach;
use super::hex_utils::{
    format_hex_address, format_optional_address, format_scalar, parse_hex_address,
};

pub fn run(
    config: &MeterConfig,
    base: &str,
    offsets: &str,
    float: bool,
    absolute: bool,
) -> Result<()> {
    let base = parse_hex_address(base)?;
    let offsets: OffsetChain = offsets
        .parse()
        .with_context(|| format!("Invalid offsets '{}'", offsets))?;
    let ty = if float { ScalarType::F32 } else { ScalarType::I32 };

    let process = attach(&config.process.image_name)?;
    let reader = MemoryReader::new(&process);
    let start = if absolute {
        base
    } else {
        process.base_address.wrapping_add(base)
    };

    println!("=== Pointer Trail ===");
    println!(
        "Base:    {} ({})",
        format_hex_address(start),
        if absolute { "absolute" } else { "image relative" }
    );
    println!("Offsets: [{}]", offsets);
    println!();

    // Each prefix of the chain is its own trail; print where every hop lands
    for depth in 1..=offsets.len() {
        let Ok(prefix) = OffsetChain::new(offsets.iter().take(depth).copied()) else {
            continue;
        };
        let hop = resolve(&reader, start, &prefix, ScalarType::I32);
        println!(
            "  +{:<8} -> {:<12} {}",
            prefix.split_last().1.to_string(),
            format_optional_address(hop.address),
            format_scalar(hop.value)
        );
    }

    let result = resolve(&reader, start, &offsets, ty);
    println!();
    println!("Address: {}", format_optional_address(result.address));
    println!("Value:   {} ({})", format_scalar(result.value), ty);
    if reader.read_bytes(start, 4).is_err() {
        println!("Base address {} is not readable", format_hex_address(start));
    }

    Ok(())
}
