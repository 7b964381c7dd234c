//! Hex address parsing and formatting utilities.

use anyhow::{Result, anyhow};
use gw2dps_core::Scalar;

/// Parse a hex address string (with or without 0x prefix)
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| anyhow!("Invalid hex address '{}': {}", s, e))
}

/// Format an address as a hex string with 0x prefix
pub fn format_hex_address(addr: u64) -> String {
    format!("0x{:X}", addr)
}

pub fn format_optional_address(addr: Option<u64>) -> String {
    addr.map(format_hex_address)
        .unwrap_or_else(|| "-".to_string())
}

/// Value as read, with the raw bits for integers
pub fn format_scalar(value: Option<Scalar>) -> String {
    match value {
        Some(Scalar::I32(v)) => format!("{} ({:#010x})", v, v as u32),
        Some(Scalar::F32(v)) => format!("{}", v),
        None => "-".to_string(),
    }
}
