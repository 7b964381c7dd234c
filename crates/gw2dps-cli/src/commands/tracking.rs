//! Main tracking mode command.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use gw2dps_core::{DisplaySink, DpsMeter, MemoryReader, MeterConfig, ReadMemory};
use tracing::{debug, info};

use super::attach;
use crate::display::{ConsoleSink, JsonSink};
use crate::input;
use crate::shutdown::ShutdownSignal;

/// Run the meter until the game exits or the user quits
pub fn run(config: &MeterConfig, json: bool) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    let process = attach(&config.process.image_name)?;
    let reader = MemoryReader::new(&process);
    let mut meter = DpsMeter::new(config, process.base_address);

    let mut sink: Box<dyn DisplaySink> = if json {
        Box::new(JsonSink::new(io::stdout()))
    } else {
        // Keys are only read for the interactive display
        let _keyboard_handle = input::spawn_keyboard_monitor(Arc::clone(&shutdown));
        Box::new(ConsoleSink::new(io::stdout(), &config.timing))
    };
    sink.set_background(config.display.background)?;
    sink.attach()?;

    let interval = config.tick_interval();
    info!("Tracking every {} ms", interval.as_millis());

    while !shutdown.is_shutdown() {
        let started = Instant::now();

        if reader.read_bytes(process.base_address, 4).is_err() {
            info!("Process terminated");
            break;
        }

        let report = meter.tick(&reader);
        if shutdown.take_reset() {
            debug!("Resetting display");
            sink.reset()?;
        }
        sink.update_data(&report)?;

        if shutdown.wait(interval.saturating_sub(started.elapsed())) {
            break;
        }
    }

    sink.detach()?;
    debug!("Stopped after {} ticks", meter.ticks());
    Ok(())
}
