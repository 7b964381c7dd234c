//! Per-tick damage from consecutive health readings.
//!
//! The sampler is a small state machine whose whole state is `SamplerState`.
//! `step` is the pure transition; `DamageSampler` wires it to a memory reader
//! for the liveness probe.

use serde::Serialize;
use tracing::debug;

use crate::memory::ReadMemory;
use crate::target::{LocatedTarget, NO_TARGET_HEALTH};

/// State carried from one tick to the next
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplerState {
    pub previous_health: f32,
    pub previous_target: Option<u64>,
}

/// Output of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageSample {
    /// Health lost since the previous tick, never negative
    pub damage: f64,
    /// Current health, `-1` without a target, `0` once a target vanished dead
    pub health: f32,
    /// Max health, `-1` without a target
    pub max_health: f32,
    pub target_changed: bool,
}

/// Advance the sampler by one tick.
///
/// `target_alive` is only consulted when the target disappeared; it is given
/// the previous target's address and tells whether the object is still there.
pub fn step(
    state: SamplerState,
    target: &LocatedTarget,
    target_alive: impl FnOnce(u64) -> bool,
) -> (SamplerState, DamageSample) {
    let mut target_changed = false;

    let health = match target.address {
        None => match state.previous_target {
            Some(previous) if !target_alive(previous) => 0.0,
            _ => NO_TARGET_HEALTH,
        },
        Some(address) => {
            target_changed = state.previous_target != Some(address);
            target.current.unwrap_or(0.0)
        }
    };

    let damage = if health != NO_TARGET_HEALTH && !target_changed {
        f64::from(state.previous_health) - f64::from(health)
    } else {
        0.0
    };

    let sample = DamageSample {
        damage: damage.max(0.0),
        health,
        max_health: if target.address.is_some() {
            target.max
        } else {
            NO_TARGET_HEALTH
        },
        target_changed,
    };
    let next = SamplerState {
        previous_health: health,
        previous_target: target.address,
    };
    (next, sample)
}

/// `step` with the liveness probe read from process memory
#[derive(Debug, Clone, Default)]
pub struct DamageSampler {
    state: SamplerState,
}

impl DamageSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn sample<R: ReadMemory + ?Sized>(
        &mut self,
        reader: &R,
        target: &LocatedTarget,
    ) -> DamageSample {
        let (next, sample) = step(self.state, target, |address| {
            reader.read_i32(address).map(|v| v != 0).unwrap_or(false)
        });

        if sample.target_changed {
            debug!(
                "Target changed to {:#x} ({})",
                target.address.unwrap_or_default(),
                target.kind.map(<&'static str>::from).unwrap_or("unknown")
            );
        } else if target.address.is_none() && self.state.previous_target.is_some() {
            debug!(
                "Target lost ({})",
                if sample.health == 0.0 { "destroyed" } else { "deselected" }
            );
        }

        self.state = next;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    fn at(address: u64, current: f32) -> LocatedTarget {
        LocatedTarget {
            address: Some(address),
            current: Some(current),
            max: 100.0,
            kind: None,
        }
    }

    fn run(targets: &[LocatedTarget], alive: bool) -> Vec<f64> {
        let mut state = SamplerState::default();
        targets
            .iter()
            .map(|target| {
                let (next, sample) = step(state, target, |_| alive);
                state = next;
                sample.damage
            })
            .collect()
    }

    #[test]
    fn test_damage_sequence_with_target_switch() {
        let damage = run(&[at(1, 100.0), at(1, 80.0), at(2, 50.0), at(2, 50.0)], true);
        assert_eq!(damage, vec![0.0, 20.0, 0.0, 0.0]);
    }

    #[test]
    fn test_regeneration_is_not_negative_damage() {
        let damage = run(&[at(1, 50.0), at(1, 60.0), at(1, 55.0)], true);
        assert_eq!(damage, vec![0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_no_target_reports_minus_one() {
        let (state, sample) = step(SamplerState::default(), &LocatedTarget::none(), |_| {
            panic!("no previous target to probe")
        });
        assert_eq!(sample.health, -1.0);
        assert_eq!(sample.max_health, -1.0);
        assert_eq!(sample.damage, 0.0);
        assert_eq!(state.previous_target, None);
        assert_eq!(state.previous_health, -1.0);
    }

    #[test]
    fn test_dead_target_counts_final_blow() {
        let damage = run(&[at(1, 100.0), at(1, 30.0), LocatedTarget::none()], false);
        assert_eq!(damage, vec![0.0, 70.0, 30.0]);
    }

    #[test]
    fn test_deselected_target_reports_no_damage() {
        let mut state = SamplerState::default();
        for target in [at(1, 100.0), at(1, 30.0)] {
            state = step(state, &target, |_| true).0;
        }
        let (state, sample) = step(state, &LocatedTarget::none(), |address| {
            assert_eq!(address, 1);
            true
        });
        assert_eq!(sample.health, -1.0);
        assert_eq!(sample.damage, 0.0);

        // after a tick without a target, there is nothing left to probe
        let (_, sample) = step(state, &LocatedTarget::none(), |_| false);
        assert_eq!(sample.health, -1.0);
    }

    #[test]
    fn test_reacquired_target_is_a_change() {
        let damage = run(&[at(1, 100.0), LocatedTarget::none(), at(1, 90.0)], true);
        assert_eq!(damage, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_current_value_reads_as_zero() {
        let target = LocatedTarget {
            current: None,
            ..at(1, 0.0)
        };
        let state = SamplerState {
            previous_health: 40.0,
            previous_target: Some(1),
        };
        let (_, sample) = step(state, &target, |_| true);
        assert_eq!(sample.health, 0.0);
        assert_eq!(sample.damage, 40.0);
    }

    #[test]
    fn test_sampler_probes_previous_address() {
        let mut reader = MockMemoryBuilder::new().i32_at(0x3008, 1).build();
        let mut sampler = DamageSampler::new();

        sampler.sample(&reader, &at(0x3008, 100.0));
        let sample = sampler.sample(&reader, &LocatedTarget::none());
        assert_eq!(sample.health, -1.0);

        sampler.sample(&reader, &at(0x3008, 60.0));
        reader.write_i32(0x3008, 0);
        let sample = sampler.sample(&reader, &LocatedTarget::none());
        assert_eq!(sample.health, 0.0);
        assert_eq!(sample.damage, 60.0);
        assert_eq!(sampler.state().previous_target, None);
    }
}
