use serde::Serialize;

use crate::config::CombatConfig;
use crate::memory::ReadMemory;

/// Raw values of the two combat cells; `None` when a read failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CombatFlags {
    pub flag: Option<i32>,
    pub sentinel: Option<u32>,
}

impl CombatFlags {
    /// The flag cell reads 0 in combat; the sentinel cell holds a fixed bit
    /// pattern in combat. Either one is enough.
    pub fn in_combat(&self, pattern: u32) -> bool {
        self.flag == Some(0) || self.sentinel == Some(pattern)
    }
}

/// Combat detector.
///
/// Stateless: every call looks at the current memory only.
#[derive(Debug, Clone)]
pub struct CombatStateTracker {
    flag_address: u64,
    sentinel_address: u64,
    pattern: u32,
}

impl CombatStateTracker {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            flag_address: config.flag_address,
            sentinel_address: config.sentinel_address,
            pattern: config.sentinel_pattern,
        }
    }

    pub fn read_flags<R: ReadMemory + ?Sized>(&self, reader: &R) -> CombatFlags {
        CombatFlags {
            flag: reader.read_i32(self.flag_address).ok(),
            sentinel: reader.read_u32(self.sentinel_address).ok(),
        }
    }

    pub fn in_combat<R: ReadMemory + ?Sized>(&self, reader: &R) -> bool {
        self.read_flags(reader).in_combat(self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;
    use crate::memory::layout::combat;

    fn tracker() -> CombatStateTracker {
        CombatStateTracker::new(&CombatConfig::default())
    }

    #[test]
    fn test_flag_zero_means_combat() {
        let reader = MockMemoryBuilder::new()
            .i32_at(combat::FLAG_ADDRESS, 0)
            .f32_at(combat::SENTINEL_ADDRESS, 0.0)
            .build();
        assert!(tracker().in_combat(&reader));
    }

    #[test]
    fn test_sentinel_means_combat() {
        let reader = MockMemoryBuilder::new()
            .i32_at(combat::FLAG_ADDRESS, 1)
            .f32_at(combat::SENTINEL_ADDRESS, 1.0)
            .build();
        assert!(tracker().in_combat(&reader));
    }

    #[test]
    fn test_out_of_combat() {
        let reader = MockMemoryBuilder::new()
            .i32_at(combat::FLAG_ADDRESS, 1)
            .f32_at(combat::SENTINEL_ADDRESS, 0.5)
            .build();
        assert!(!tracker().in_combat(&reader));
    }

    #[test]
    fn test_failed_reads_are_not_combat() {
        let reader = MockMemoryBuilder::new().build();
        assert_eq!(tracker().read_flags(&reader), CombatFlags::default());
        assert!(!tracker().in_combat(&reader));

        let reader = MockMemoryBuilder::new()
            .f32_at(combat::SENTINEL_ADDRESS, 1.0)
            .build();
        assert!(tracker().in_combat(&reader));
    }

    #[test]
    fn test_custom_pattern() {
        let config = CombatConfig {
            sentinel_pattern: 7,
            ..CombatConfig::default()
        };
        let reader = MockMemoryBuilder::new()
            .i32_at(combat::FLAG_ADDRESS, 1)
            .i32_at(combat::SENTINEL_ADDRESS, 7)
            .build();
        assert!(CombatStateTracker::new(&config).in_combat(&reader));
        assert!(!tracker().in_combat(&reader));
    }
}
