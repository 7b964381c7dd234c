//! Per-combat averages.
//!
//! While in combat every tick's rate is recorded. When combat ends the trailing
//! run of zero samples (the time spent waiting for the combat flag to drop) is
//! cut off and the rest is averaged.

use tracing::debug;

/// Index of the last non-zero sample
pub fn last_nonzero_index(samples: &[i64]) -> Option<usize> {
    samples.iter().rposition(|&v| v != 0)
}

/// Floor average of `samples` without its trailing zeros.
///
/// Interior zeros are kept. Returns `None` for an empty or all-zero slice.
pub fn trimmed_average(samples: &[i64]) -> Option<i64> {
    let end = last_nonzero_index(samples)? + 1;
    let trimmed = &samples[..end];
    // Rates saturate at i64::MAX on garbage health values
    let sum: i128 = trimmed.iter().map(|&v| i128::from(v)).sum();
    let average = sum.div_euclid(trimmed.len() as i128);
    Some(i64::try_from(average).unwrap_or(i64::MAX))
}

/// Collects one combat session's samples and averages them when it ends
#[derive(Debug, Clone, Default)]
pub struct CombatAverageTracker {
    samples: Vec<i64>,
    last_average: Option<i64>,
}

impl CombatAverageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tick. Returns the session average on the tick combat ends.
    ///
    /// Samples are only recorded in combat, so a non-empty buffer outside of
    /// combat means combat just ended. The buffer is cleared either way; a
    /// session without damage leaves the previous average untouched.
    pub fn observe(&mut self, rate: i64, in_combat: bool) -> Option<i64> {
        if in_combat {
            self.samples.push(rate);
            return None;
        }
        if self.samples.is_empty() {
            return None;
        }

        let average = trimmed_average(&self.samples);
        debug!(
            "Combat ended after {} samples, average {:?}",
            self.samples.len(),
            average
        );
        self.samples.clear();

        if average.is_some() {
            self.last_average = average;
        }
        average
    }

    /// Most recent non-empty session average
    pub fn last_average(&self) -> Option<i64> {
        self.last_average
    }

    pub fn session_len(&self) -> usize {
        self.samples.len()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.last_average = None;
    }
}
