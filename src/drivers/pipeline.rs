use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use log::{debug, warn};
use crate::drivers::error::MonitorError;
use crate::drivers::parser::{classify, parse_telemetry, LineKind};
use crate::drivers::source::LineSource;
use crate::drivers::{Sample, SharedBuffer};
use crate::types::MonitorMessage;
/// What one pass of the pipeline did with its input.
#[derive(Debug)]
pub enum PumpOutcome {
    /// Nothing pending on the link.
    Idle,
    /// Empty line or read timeout.
    Skipped,
    Accepted(Sample),
    Plain,
    Rejected(MonitorError),
}
/// Drains a line source into the sample buffer and the log channel.
///
/// Every per-line failure is reported and contained here; nothing a
/// device sends can stop the caller's loop.
pub struct AcquisitionPipeline<S: LineSource> {
    source: S,
    buffer: SharedBuffer,
    active: Arc<AtomicBool>,
    tx: Sender<MonitorMessage>,
}
impl<S: LineSource> AcquisitionPipeline<S> {
    pub fn new(
        source: S,
        buffer: SharedBuffer,
        active: Arc<AtomicBool>,
        tx: Sender<MonitorMessage>,
    ) -> Self {
        Self {
            source,
            buffer,
            active,
            tx,
        }
    }
    pub fn pump_once(&mut self) -> PumpOutcome {
        if !self.source.has_data() {
            return PumpOutcome::Idle;
        }
        match self.source.read_line() {
            Ok(raw) => self.route_bytes(raw),
            Err(e) => self.reject(e, None),
        }
    }
    pub fn route_bytes(&mut self, raw: Vec<u8>) -> PumpOutcome {
        match String::from_utf8(raw) {
            Ok(text) => self.route_line(text.trim()),
            Err(e) => self.reject(e.into(), None),
        }
    }
    pub fn route_line(&mut self, line: &str) -> PumpOutcome {
        match classify(line, self.active.load(Ordering::Acquire)) {
            LineKind::Empty => PumpOutcome::Skipped,
            LineKind::Plain => {
                self.send(MonitorMessage::ReplyLog(format!("Received: {line}")));
                PumpOutcome::Plain
            }
            LineKind::Telemetry => {
                self.send(MonitorMessage::PlotLog(format!("Received: {line}")));
                match parse_telemetry(line) {
                    Ok(reading) => {
                        let sample = self.buffer.append(reading.speed, reading.battery);
                        debug!("sample #{} speed={}% battery={}V", sample.index, sample.speed, sample.battery);
                        PumpOutcome::Accepted(sample)
                    }
                    Err(e) => self.reject(e, Some(line)),
                }
            }
        }
    }
    fn reject(&self, error: MonitorError, line: Option<&str>) -> PumpOutcome {
        let text = match line {
            Some(line) => format!("Error parsing PLOT DATA: {error} ({line})"),
            None => format!("Dropped input: {error}"),
        };
        warn!("{text}");
        self.send(MonitorMessage::Diagnostic(text));
        PumpOutcome::Rejected(error)
    }
    fn send(&self, message: MonitorMessage) {
        // The GUI may already be gone during shutdown.
        self.tx.send(message).ok();
    }
}
