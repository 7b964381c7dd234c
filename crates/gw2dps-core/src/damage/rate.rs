//! Windowed damage rates.
//!
//! A window holds the last `capacity` per-tick damage samples. Once it is full
//! every push reports `sum / window_secs`, truncated toward zero; while it is
//! still filling the rate is 0, so the first `capacity - 1` ticks after a start
//! under-report by design.

use std::collections::VecDeque;

/// Ticks per second at a given tick interval, truncated, at least 1
pub fn ticks_per_second(tick_ms: u64) -> usize {
    (1000 / tick_ms.max(1)).max(1) as usize
}

/// Fixed-capacity FIFO of damage samples
#[derive(Debug, Clone)]
pub struct RateAggregator {
    window_secs: u32,
    capacity: usize,
    samples: VecDeque<f64>,
}

impl RateAggregator {
    /// Window of `window_secs` seconds sampled every `tick_ms` milliseconds
    pub fn new(window_secs: u32, tick_ms: u64) -> Self {
        Self::with_capacity(window_secs, window_secs as usize * ticks_per_second(tick_ms))
    }

    pub fn with_capacity(window_secs: u32, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window_secs: window_secs.max(1),
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Add one tick's damage and return the current rate.
    ///
    /// The oldest sample is dropped first when the window is already full, so
    /// the window never holds more than `capacity` samples.
    pub fn push(&mut self, sample: f64) -> i64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);

        if self.samples.len() < self.capacity {
            return 0;
        }
        let sum: f64 = self.samples.iter().sum();
        (sum / f64::from(self.window_secs)).trunc() as i64
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn window_secs(&self) -> u32 {
        self.window_secs
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
