//! Memory layout constants for Guild Wars 2 data structures
//!
//! Addresses here are the values observed for the 32-bit client. They are only
//! defaults: every one of them can be replaced from the configuration file after
//! a game patch moves things around.

/// Word size (4 bytes / 32-bit integer). Pointers in the client are one word.
pub const WORD: u64 = 4;

/// Layout of the health record a target pointer trail ends on
pub mod health {
    use super::WORD;

    /// Current health (f32)
    pub const CURRENT: u64 = 0;
    /// Maximum health (f32), directly after the current value
    pub const MAX: u64 = WORD;
}

/// Default pointer trail to the selected target's health
pub mod target {
    /// Base of the trail, relative to the `Gw2.exe` image base
    pub const REGULAR_BASE: u64 = 0x13E_B0B4;
    /// Offsets applied after each dereference
    pub const REGULAR_OFFSETS: [i64; 3] = [0x34, 0x150, 0x8];
}

/// Default combat flag cells (absolute addresses)
pub mod combat {
    /// Reads 0 while in combat, 1 otherwise
    pub const FLAG_ADDRESS: u64 = 0x0171_654C;
    /// Holds `IN_COMBAT_PATTERN` while in combat
    pub const SENTINEL_ADDRESS: u64 = 0x0171_5970;
    /// Bit pattern of `1.0f32`
    pub const IN_COMBAT_PATTERN: u32 = 1_065_353_216;
}

/// Timing constants for polling and display
pub mod timing {
    /// Interval between ticks (ms)
    pub const TICK_INTERVAL_MS: u64 = 250;

    /// Length of the instant rate window (s)
    pub const INSTANT_WINDOW_SECS: u32 = 1;

    /// Length of the sustained rate window (s)
    pub const SUSTAINED_WINDOW_SECS: u32 = 5;

    /// How long a new peak rate stays on screen (s)
    pub const PEAK_FREEZE_SECS: u32 = 3;

    /// How long a combat average stays on screen (s)
    pub const AVERAGE_FREEZE_SECS: u32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_combat_pattern_is_one_f32() {
        assert_eq!(f32::from_bits(combat::IN_COMBAT_PATTERN), 1.0);
    }

    #[test]
    fn test_max_health_follows_current() {
        assert_eq!(health::MAX - health::CURRENT, WORD);
    }
}
