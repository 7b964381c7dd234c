use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::memory::{ReadMemory, ScalarType};
use crate::offset::{OffsetChain, PointerTrailResult, resolve};

/// Kind of in-game object a trail leads to.
///
/// Different object kinds keep their health record at different pointer
/// depths, so each kind gets its own trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    #[default]
    #[strum(serialize = "regular")]
    Regular,
    #[strum(serialize = "world boss")]
    WorldBoss,
    #[strum(serialize = "structure")]
    Structure,
}

/// A statically known trail to a target's health record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCandidate {
    pub kind: TargetKind,
    /// Absolute address the trail starts at
    pub base: u64,
    pub offsets: OffsetChain,
}

impl TargetCandidate {
    pub fn new(kind: TargetKind, base: u64, offsets: OffsetChain) -> Self {
        Self {
            kind,
            base,
            offsets,
        }
    }

    /// Walk the trail, reading current health as a float
    pub fn resolve<R: ReadMemory + ?Sized>(&self, reader: &R) -> PointerTrailResult {
        resolve(reader, self.base, &self.offsets, ScalarType::F32)
    }
}
