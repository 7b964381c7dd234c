use serde::Serialize;
use strum::{Display, IntoStaticStr};

use super::Colour;

/// Why a readout shows the value it shows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Emphasis {
    /// Live rate
    #[default]
    Normal,
    /// A new session maximum, held for a while
    Peak,
    /// The average of the combat that just ended, held for a while
    CombatAverage,
}

impl Emphasis {
    /// Foreground colour used by the graphical displays
    pub fn colour(&self) -> Colour {
        match self {
            Emphasis::Normal => Colour::WHITE,
            Emphasis::Peak => Colour::RED,
            Emphasis::CombatAverage => Colour::ORANGE,
        }
    }
}

/// What a readout shows on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisplayFrame {
    pub value: i64,
    pub emphasis: Emphasis,
}

impl DisplayFrame {
    pub fn live(value: i64) -> Self {
        Self {
            value,
            emphasis: Emphasis::Normal,
        }
    }
}

/// Presentation state of one rate readout.
///
/// A new session max freezes the readout on that max, a combat average freezes
/// it on the average. While frozen the live rate is ignored. A freeze lasts
/// `period_ms / tick_ms` ticks, counting the tick that started it.
#[derive(Debug, Clone)]
pub struct ChannelDisplay {
    tick_ms: u64,
    peak_freeze_ms: u64,
    average_freeze_ms: u64,
    max: i64,
    last_average: i64,
    frozen_ticks: u64,
    frame: DisplayFrame,
}

impl ChannelDisplay {
    pub fn new(tick_ms: u64, peak_freeze_secs: u32, average_freeze_secs: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            peak_freeze_ms: u64::from(peak_freeze_secs) * 1000,
            average_freeze_ms: u64::from(average_freeze_secs) * 1000,
            max: 0,
            last_average: 0,
            frozen_ticks: 0,
            frame: DisplayFrame::default(),
        }
    }

    /// Feed one tick's rate and, on the tick that ends combat, the average
    pub fn update(&mut self, rate: i64, average: Option<i64>) -> DisplayFrame {
        if rate > self.max {
            self.max = rate;
            self.freeze(rate, Emphasis::Peak, self.peak_freeze_ms);
        }

        if let Some(average) = average {
            self.last_average = average;
            self.freeze(average, Emphasis::CombatAverage, self.average_freeze_ms);
        }

        if self.frozen_ticks > 0 {
            self.frozen_ticks -= 1;
        } else {
            self.frame = DisplayFrame::live(rate);
        }
        self.frame
    }

    // Holds for the full period. The Tk overlay counted its freezing tick down
    // twice and so showed a frozen value one tick shorter.
    fn freeze(&mut self, value: i64, emphasis: Emphasis, period_ms: u64) {
        self.frozen_ticks = period_ms / self.tick_ms;
        self.frame = DisplayFrame { value, emphasis };
    }

    pub fn frame(&self) -> DisplayFrame {
        self.frame
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_ticks > 0
    }

    /// `(session max, last combat average)`
    pub fn summary(&self) -> (i64, i64) {
        (self.max, self.last_average)
    }

    pub fn reset(&mut self) {
        self.max = 0;
        self.last_average = 0;
        self.frozen_ticks = 0;
        self.frame = DisplayFrame::live(0);
    }
}
