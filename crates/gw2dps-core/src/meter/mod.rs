//! The tick pipeline.
//!
//! One [`DpsMeter::tick`] reads the target and the combat flags, turns the
//! health change into damage, pushes it into both rate windows and feeds the
//! resulting rates to the per-combat averages. The caller owns the schedule;
//! ticks must not overlap.

use serde::Serialize;
use tracing::{debug, info};

use crate::combat::{CombatAverageTracker, CombatStateTracker};
use crate::config::MeterConfig;
use crate::damage::{DamageSampler, RateAggregator};
use crate::memory::ReadMemory;
use crate::target::{TargetKind, TargetLocator};

/// Everything a display needs from one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    /// Damage dealt since the previous tick
    pub damage: f64,
    pub instant_rate: i64,
    pub sustained_rate: i64,
    pub in_combat: bool,
    /// `-1` without a target
    pub target_health: f32,
    /// `-1` without a target
    pub target_max_health: f32,
    pub target_kind: Option<TargetKind>,
    /// Set on the tick that ends a combat with damage in it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_average: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sustained_average: Option<i64>,
}

impl TickReport {
    pub fn has_target(&self) -> bool {
        self.target_kind.is_some()
    }

    /// True on the tick that ends combat with a new average
    pub fn ends_combat(&self) -> bool {
        self.instant_average.is_some() || self.sustained_average.is_some()
    }
}

pub struct DpsMeter {
    locator: TargetLocator,
    combat: CombatStateTracker,
    sampler: DamageSampler,
    instant: RateAggregator,
    sustained: RateAggregator,
    instant_average: CombatAverageTracker,
    sustained_average: CombatAverageTracker,
    in_combat: bool,
    ticks: u64,
}

impl DpsMeter {
    /// Build a meter for a process whose game image is loaded at `module_base`
    pub fn new(config: &MeterConfig, module_base: u64) -> Self {
        let timing = &config.timing;
        let locator = TargetLocator::new(config.candidates(module_base));
        for candidate in locator.candidates() {
            debug!(
                "Target trail ({}): {:#x} -> [{}]",
                candidate.kind, candidate.base, candidate.offsets
            );
        }

        Self {
            locator,
            combat: CombatStateTracker::new(&config.combat),
            sampler: DamageSampler::new(),
            instant: RateAggregator::new(timing.instant_window_secs, timing.tick_ms),
            sustained: RateAggregator::new(timing.sustained_window_secs, timing.tick_ms),
            instant_average: CombatAverageTracker::new(),
            sustained_average: CombatAverageTracker::new(),
            in_combat: false,
            ticks: 0,
        }
    }

    pub fn tick<R: ReadMemory + ?Sized>(&mut self, reader: &R) -> TickReport {
        let target = self.locator.locate(reader);
        let sample = self.sampler.sample(reader, &target);
        let in_combat = self.combat.in_combat(reader);

        let instant_rate = self.instant.push(sample.damage);
        let sustained_rate = self.sustained.push(sample.damage);

        let instant_average = self.instant_average.observe(instant_rate, in_combat);
        let sustained_average = self.sustained_average.observe(sustained_rate, in_combat);

        if in_combat && !self.in_combat {
            info!("Combat started");
        } else if !in_combat && self.in_combat {
            match (instant_average, sustained_average) {
                (None, None) => info!("Combat ended without damage"),
                (instant, sustained) => info!(
                    "Combat ended: average {} (instant) / {} (sustained)",
                    instant.unwrap_or_default(),
                    sustained.unwrap_or_default()
                ),
            }
        }
        self.in_combat = in_combat;
        self.ticks += 1;

        TickReport {
            damage: sample.damage,
            instant_rate,
            sustained_rate,
            in_combat,
            target_health: sample.health,
            target_max_health: sample.max_health,
            target_kind: target.kind,
            instant_average,
            sustained_average,
        }
    }

    pub fn locator(&self) -> &TargetLocator {
        &self.locator
    }

    pub fn combat(&self) -> &CombatStateTracker {
        &self.combat
    }

    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Most recent non-empty combat averages, `(instant, sustained)`
    pub fn last_averages(&self) -> (Option<i64>, Option<i64>) {
        (
            self.instant_average.last_average(),
            self.sustained_average.last_average(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CombatConfig, MeterConfig, TargetSpec};
    use crate::memory::{MockMemoryBuilder, MockMemoryReader};
    use crate::offset::OffsetChain;

    const MODULE: u64 = 0x40_0000;
    const FLAG: u64 = 0x10;
    const SENTINEL: u64 = 0x14;
    const HEALTH: u64 = 0x1008;

    fn config() -> MeterConfig {
        MeterConfig::builder()
            .targets(vec![TargetSpec::new(
                TargetKind::Regular,
                0x100,
                OffsetChain::from([0x8]),
            )])
            .combat(CombatConfig {
                flag_address: FLAG,
                sentinel_address: SENTINEL,
                ..CombatConfig::default()
            })
            .build()
            .unwrap()
    }

    fn memory() -> MockMemoryReader {
        MockMemoryBuilder::new()
            .ptr_at(MODULE + 0x100, 0x1000)
            .f32_at(HEALTH, 1000.0)
            .f32_at(HEALTH + 4, 1000.0)
            .i32_at(FLAG, 1)
            .i32_at(SENTINEL, 0)
            .build()
    }

    #[test]
    fn test_idle_tick() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let reader = MockMemoryBuilder::new().i32_at(FLAG, 1).build();

        let report = meter.tick(&reader);
        assert_eq!(report.damage, 0.0);
        assert_eq!(report.instant_rate, 0);
        assert!(!report.in_combat);
        assert!(!report.has_target());
        assert_eq!(report.target_health, -1.0);
        assert_eq!(report.target_max_health, -1.0);
        assert!(!report.ends_combat());
        assert_eq!(meter.ticks(), 1);
    }

    #[test]
    fn test_combat_session() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let mut reader = memory();
        reader.write_i32(FLAG, 0);

        let mut reports = Vec::new();
        for health in [1000.0, 900.0, 800.0, 700.0] {
            reader.write_f32(HEALTH, health);
            reports.push(meter.tick(&reader));
        }
        let damage: Vec<f64> = reports.iter().map(|r| r.damage).collect();
        assert_eq!(damage, vec![0.0, 100.0, 100.0, 100.0]);
        let rates: Vec<i64> = reports.iter().map(|r| r.instant_rate).collect();
        assert_eq!(rates, vec![0, 0, 0, 300]);
        assert!(reports.iter().all(|r| r.in_combat && r.sustained_rate == 0));
        assert_eq!(reports[3].target_health, 700.0);
        assert_eq!(reports[3].target_max_health, 1000.0);
        assert_eq!(reports[3].target_kind, Some(TargetKind::Regular));

        reader.write_i32(FLAG, 1);
        let end = meter.tick(&reader);
        assert!(!end.in_combat);
        assert_eq!(end.instant_rate, 300);
        // [0, 0, 0, 300] averaged; the sustained window never filled
        assert_eq!(end.instant_average, Some(75));
        assert_eq!(end.sustained_average, None);
        assert!(end.ends_combat());
        assert_eq!(meter.last_averages(), (Some(75), None));

        let after = meter.tick(&reader);
        assert_eq!(after.instant_average, None);
    }

    #[test]
    fn test_sentinel_alone_means_combat() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let mut reader = memory();
        reader.write_i32(SENTINEL, 1.0f32.to_bits() as i32);

        assert!(meter.tick(&reader).in_combat);
        assert!(meter.in_combat());
    }

    #[test]
    fn test_unreadable_flags_mean_no_combat() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let mut reader = memory();
        reader.unmap(FLAG);
        reader.unmap(SENTINEL);

        assert!(!meter.tick(&reader).in_combat);
    }

    #[test]
    fn test_target_killed_counts_final_blow() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let mut reader = memory();
        reader.write_f32(HEALTH, 40.0);
        meter.tick(&reader);

        // The trail now ends on zero health and the object is gone
        reader.write_f32(HEALTH, 0.0);
        let report = meter.tick(&reader);
        assert!(!report.has_target());
        assert_eq!(report.damage, 40.0);
        assert_eq!(report.target_health, 0.0);
    }

    #[test]
    fn test_garbage_health_saturates_without_panic() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let mut reader = memory();
        reader.write_i32(FLAG, 0);
        reader.write_f32(HEALTH + 4, 3.4e38);

        let mut last = None;
        for health in [3.0e38, 1.0, 1.0, 1.0] {
            reader.write_f32(HEALTH, health);
            last = Some(meter.tick(&reader));
        }
        assert_eq!(last.map(|r| r.instant_rate), Some(i64::MAX));

        reader.write_i32(FLAG, 1);
        let end = meter.tick(&reader);
        assert_eq!(end.instant_average, Some(i64::MAX / 4));
    }

    #[test]
    fn test_report_json_shape() {
        let mut meter = DpsMeter::new(&config(), MODULE);
        let report = meter.tick(&memory());
        let json = serde_json::to_value(report).unwrap();

        assert_eq!(json["target_kind"], "regular");
        assert_eq!(json["target_health"], 1000.0);
        assert!(json.get("instant_average").is_none());
    }
}
