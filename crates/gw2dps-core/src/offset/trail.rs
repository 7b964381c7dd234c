//! Pointer trail resolution.
//!
//! A trail starts at a fixed base address, dereferences a 32-bit pointer, adds
//! an offset, dereferences again, and so on. The last offset is added without a
//! dereference and the value at that address is read with the requested type.

use serde::Serialize;
use tracing::trace;

use crate::memory::{ReadMemory, Scalar, ScalarType};
use crate::offset::OffsetChain;

/// Whether a value read from memory can be followed as a pointer.
///
/// The client never keeps live objects at small or "negative" 32-bit addresses,
/// so anything `<= 0` is treated as null. This is a heuristic about the
/// client's address space, not a real validity check.
pub fn is_plausible_pointer(value: i64) -> bool {
    value > 0
}

/// Outcome of walking a trail.
///
/// `value` is only ever present together with `address`. Both are `None` when
/// a link of the chain was not a plausible pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PointerTrailResult {
    pub address: Option<u64>,
    pub value: Option<Scalar>,
}

impl PointerTrailResult {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }
}

fn read_pointer<R: ReadMemory + ?Sized>(reader: &R, address: i64) -> Option<i64> {
    let address = u64::try_from(address).ok()?;
    let pointer = reader.read_i32(address).ok()? as i64;
    if is_plausible_pointer(pointer) {
        Some(pointer)
    } else {
        trace!("Null-like pointer {:#x} at {:#x}", pointer, address);
        None
    }
}

/// Walk `offsets` from `base` and read the final value as `ty`.
///
/// Issues at most `offsets.len() + 1` reads. Read failures count as null
/// pointers (or a missing value for the last read) and never surface as errors.
pub fn resolve<R: ReadMemory + ?Sized>(
    reader: &R,
    base: u64,
    offsets: &OffsetChain,
    ty: ScalarType,
) -> PointerTrailResult {
    let Ok(base) = i64::try_from(base) else {
        return PointerTrailResult::unresolved();
    };
    let Some(mut pointer) = read_pointer(reader, base) else {
        return PointerTrailResult::unresolved();
    };

    let (links, last) = offsets.split_last();
    for offset in links {
        match read_pointer(reader, pointer.saturating_add(offset.value())) {
            Some(next) => pointer = next,
            None => return PointerTrailResult::unresolved(),
        }
    }

    let address = pointer.saturating_add(last.value());
    if !is_plausible_pointer(address) {
        trace!("Trail from {:#x} ends on non-positive address {}", base, address);
        return PointerTrailResult::unresolved();
    }

    let address = address as u64;
    PointerTrailResult {
        address: Some(address),
        value: reader.read_scalar(address, ty).ok(),
    }
}
