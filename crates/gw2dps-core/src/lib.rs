//! # gw2dps-core
//!
//! Core library for the Guild Wars 2 damage meter.
//!
//! This crate provides:
//! - Windows process memory reading behind the `ReadMemory` trait
//! - Pointer trail resolution with plausibility checks
//! - Target selection, combat detection and per-tick damage sampling
//! - Windowed damage rates and per-combat averages
//! - A toolkit free display model and TOML configuration
//!
//! `DpsMeter::tick` runs the whole pipeline once; the caller schedules ticks.

pub mod combat;
pub mod config;
pub mod damage;
pub mod display;
pub mod error;
pub mod memory;
pub mod meter;
pub mod offset;
pub mod target;

pub use combat::{CombatAverageTracker, CombatFlags, CombatStateTracker, trimmed_average};
pub use config::{
    CombatConfig, DEFAULT_CONFIG_FILE, DisplayConfig, MeterConfig, MeterConfigBuilder,
    ProcessConfig, TargetSpec, TimingConfig,
};
pub use damage::{DamageSample, DamageSampler, RateAggregator, SamplerState};
pub use display::{
    ChannelDisplay, Colour, DisplayFrame, DisplaySink, Emphasis, MeterDisplay, MeterFrame,
};
pub use error::{Error, Result};
pub use memory::{MemoryReader, ProcessHandle, ReadMemory, Scalar, ScalarType};
pub use meter::{DpsMeter, TickReport};
pub use offset::{Offset, OffsetChain, PointerTrailResult, is_plausible_pointer, resolve};
pub use target::{
    CandidateProbe, LocatedTarget, TargetCandidate, TargetKind, TargetLocator, Verdict,
};
