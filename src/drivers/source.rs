#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::{Arc, Mutex, PoisonError};
use crate::drivers::MonitorError;
/// Read half of the device link: yields raw, newline-stripped lines.
pub trait LineSource: Send {
    /// Non-blocking check for pending input.
    fn has_data(&mut self) -> bool;
    /// Blocks up to the link's read timeout; an empty vec means the timeout elapsed.
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError>;
}
/// Write half of the device link.
pub trait LineSink: Send {
    /// Writes `text` followed by a line terminator.
    fn write_line(&mut self, text: &str) -> Result<(), MonitorError>;
}
impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn has_data(&mut self) -> bool {
        (**self).has_data()
    }
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError> {
        (**self).read_line()
    }
}
impl<T: LineSink + ?Sized> LineSink for Box<T> {
    fn write_line(&mut self, text: &str) -> Result<(), MonitorError> {
        (**self).write_line(text)
    }
}
/// Stand-in for a link that never opened. Reads idle, writes are refused.
#[derive(Clone, Copy, Debug, Default)]
pub struct Disconnected;
impl LineSource for Disconnected {
    fn has_data(&mut self) -> bool {
        false
    }
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError> {
        Ok(Vec::new())
    }
}
impl LineSink for Disconnected {
    fn write_line(&mut self, _text: &str) -> Result<(), MonitorError> {
        Err(MonitorError::Disconnected)
    }
}
/// In-memory source useful for tests and deterministic playback.
#[cfg(test)]
pub struct ManualSource {
    queue: VecDeque<Vec<u8>>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<L: Into<Vec<u8>>>(lines: impl IntoIterator<Item = L>) -> Self {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn has_data(&mut self) -> bool {
        !self.queue.is_empty()
    }
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError> {
        Ok(self.queue.pop_front().unwrap_or_default())
    }
}
/// Sink that keeps every written line (terminator included).
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingSink {
    written: Arc<Mutex<Vec<String>>>,
}
#[cfg(test)]
impl RecordingSink {
    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
#[cfg(test)]
impl LineSink for RecordingSink {
    fn write_line(&mut self, text: &str) -> Result<(), MonitorError> {
        self.written
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{text}\n"));
        Ok(())
    }
}
