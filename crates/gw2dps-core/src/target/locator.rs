//! Picking the live target out of several candidate trails.

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::trace;

use crate::memory::ReadMemory;
use crate::memory::layout::health;
use crate::offset::PointerTrailResult;
use crate::target::{TargetCandidate, TargetKind};

/// Max health reported when no target is selected
pub const NO_TARGET_HEALTH: f32 = -1.0;

/// The target selected for this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocatedTarget {
    pub address: Option<u64>,
    pub current: Option<f32>,
    pub max: f32,
    pub kind: Option<TargetKind>,
}

impl LocatedTarget {
    pub fn none() -> Self {
        Self {
            address: None,
            current: None,
            max: NO_TARGET_HEALTH,
            kind: None,
        }
    }

    pub fn is_some(&self) -> bool {
        self.address.is_some()
    }
}

impl Default for LocatedTarget {
    fn default() -> Self {
        Self::none()
    }
}

/// Why a candidate was or was not taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr, Display)]
pub enum Verdict {
    #[strum(serialize = "accepted")]
    Accepted,
    #[strum(serialize = "trail broken")]
    Unresolved,
    #[strum(serialize = "current health unreadable")]
    NoValue,
    #[strum(serialize = "current health is zero")]
    ZeroHealth,
    #[strum(serialize = "max health unreadable")]
    MaxUnreadable,
    #[strum(serialize = "current health negative")]
    NegativeHealth,
    #[strum(serialize = "max health not positive")]
    MaxNotPositive,
    #[strum(serialize = "max health below current")]
    MaxBelowCurrent,
}

/// Full evaluation of one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateProbe {
    pub kind: TargetKind,
    pub base: u64,
    pub trail: PointerTrailResult,
    pub max: Option<f32>,
    pub verdict: Verdict,
}

impl CandidateProbe {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// Tries candidate trails in priority order
#[derive(Debug, Clone)]
pub struct TargetLocator {
    candidates: Vec<TargetCandidate>,
}

impl TargetLocator {
    pub fn new(candidates: Vec<TargetCandidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[TargetCandidate] {
        &self.candidates
    }

    /// Return the first candidate that resolves to a plausible live target.
    ///
    /// Plausible means a resolved address, a current health that is non-zero
    /// once truncated, and a max health (the float after it) that is positive
    /// and not below the truncated current health.
    pub fn locate<R: ReadMemory + ?Sized>(&self, reader: &R) -> LocatedTarget {
        for candidate in &self.candidates {
            let probe = evaluate(candidate, reader);
            if probe.is_accepted() {
                return LocatedTarget {
                    address: probe.trail.address,
                    current: probe.trail.value.map(|v| v.as_f32()),
                    max: probe.max.unwrap_or(NO_TARGET_HEALTH),
                    kind: Some(candidate.kind),
                };
            }
            trace!("Skipping {} candidate: {}", candidate.kind, probe.verdict);
        }
        LocatedTarget::none()
    }

    /// Evaluate every candidate, without stopping at the first accepted one
    pub fn inspect<R: ReadMemory + ?Sized>(&self, reader: &R) -> Vec<CandidateProbe> {
        self.candidates
            .iter()
            .map(|candidate| evaluate(candidate, reader))
            .collect()
    }
}

// NaN health has to fail both max checks
#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn evaluate<R: ReadMemory + ?Sized>(candidate: &TargetCandidate, reader: &R) -> CandidateProbe {
    let trail = candidate.resolve(reader);
    let probe = |max, verdict| CandidateProbe {
        kind: candidate.kind,
        base: candidate.base,
        trail,
        max,
        verdict,
    };

    let Some(address) = trail.address else {
        return probe(None, Verdict::Unresolved);
    };
    let Some(value) = trail.value else {
        return probe(None, Verdict::NoValue);
    };

    let current = value.as_f32().trunc();
    if current == 0.0 {
        return probe(None, Verdict::ZeroHealth);
    }
    if current < 0.0 {
        return probe(None, Verdict::NegativeHealth);
    }

    let max_address = address - health::CURRENT + health::MAX;
    let Ok(max) = reader.read_f32(max_address) else {
        return probe(None, Verdict::MaxUnreadable);
    };

    let verdict = if !(max > 0.0) {
        Verdict::MaxNotPositive
    } else if !(max >= current) {
        Verdict::MaxBelowCurrent
    } else {
        Verdict::Accepted
    };
    probe(Some(max), verdict)
}
