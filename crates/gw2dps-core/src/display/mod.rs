//! Presentation model shared by every display.
//!
//! Nothing here draws anything. A [`DisplaySink`] receives one
//! [`TickReport`](crate::meter::TickReport) per tick and decides how to show it;
//! [`ChannelDisplay`] holds the toolkit free state of one rate readout (session
//! max, frozen peaks and combat averages).

mod channel;
mod colour;

pub use channel::*;
pub use colour::*;

use serde::Serialize;

use crate::config::TimingConfig;
use crate::error::Result;
use crate::meter::TickReport;

/// A consumer of meter output.
///
/// Sinks are attached before the first tick and detached after the last one.
/// A detached sink must not be fed.
pub trait DisplaySink {
    fn attach(&mut self) -> Result<()> {
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        Ok(())
    }

    fn update_data(&mut self, report: &TickReport) -> Result<()>;

    fn set_background(&mut self, colour: Colour) -> Result<()>;

    /// Forget the session max and the last combat average
    fn reset(&mut self) -> Result<()>;
}

/// Both rate readouts of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MeterFrame {
    pub instant: DisplayFrame,
    pub sustained: DisplayFrame,
}

/// Presentation state of the instant and sustained readouts
#[derive(Debug, Clone)]
pub struct MeterDisplay {
    instant: ChannelDisplay,
    sustained: ChannelDisplay,
}

impl MeterDisplay {
    pub fn new(timing: &TimingConfig) -> Self {
        let channel = || {
            ChannelDisplay::new(
                timing.tick_ms,
                timing.peak_freeze_secs,
                timing.average_freeze_secs,
            )
        };
        Self {
            instant: channel(),
            sustained: channel(),
        }
    }

    pub fn update(&mut self, report: &TickReport) -> MeterFrame {
        MeterFrame {
            instant: self
                .instant
                .update(report.instant_rate, report.instant_average),
            sustained: self
                .sustained
                .update(report.sustained_rate, report.sustained_average),
        }
    }

    pub fn instant(&self) -> &ChannelDisplay {
        &self.instant
    }

    pub fn sustained(&self) -> &ChannelDisplay {
        &self.sustained
    }

    pub fn reset(&mut self) {
        self.instant.reset();
        self.sustained.reset();
    }
}
