// src/engine.rs
use crate::drivers::{AcquisitionPipeline, LineSource, MonitorError, PumpOutcome};
use log::{info, warn};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const PROGRESS_EVERY: usize = 1000;

/// Starts the acquisition loop on its own thread.
///
/// The loop has no exit: it lives until the process does. With nothing
/// pending on the link it sleeps `idle_poll` before checking again.
pub fn spawn_acquisition<S>(
    mut pipeline: AcquisitionPipeline<S>,
    idle_poll: Duration,
) -> io::Result<JoinHandle<()>>
where
    S: LineSource + 'static,
{
    thread::Builder::new()
        .name("acquisition".to_owned())
        .spawn(move || {
            info!("acquisition loop started (idle poll {idle_poll:?})");
            loop {
                match pipeline.pump_once() {
                    PumpOutcome::Idle => thread::sleep(idle_poll),
                    PumpOutcome::Accepted(sample) if (sample.index + 1) % PROGRESS_EVERY == 0 => {
                        info!("{} samples buffered", sample.index + 1);
                    }
                    PumpOutcome::Rejected(MonitorError::Io(e)) => {
                        warn!("link read failed ({e}); waiting without input");
                    }
                    _ => {}
                }
            }
        })
}
