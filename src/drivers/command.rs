use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use log::{info, warn};
use crate::drivers::source::LineSink;
use crate::types::MonitorMessage;
/// Control commands understood by the device firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    PowerOn,
    PowerOff,
    RequestLog,
}
impl Command {
    pub fn wire(self) -> &'static str {
        match self {
            Command::PowerOn => "1",
            Command::PowerOff => "0",
            Command::RequestLog => "R",
        }
    }
}
/// Write side of the link, used from the UI thread.
pub struct CommandSender<W: LineSink> {
    sink: W,
    active: Arc<AtomicBool>,
    tx: Sender<MonitorMessage>,
}
impl<W: LineSink> CommandSender<W> {
    pub fn new(sink: W, active: Arc<AtomicBool>, tx: Sender<MonitorMessage>) -> Self {
        Self { sink, active, tx }
    }
    /// Flips acquisition before the device hears about it.
    pub fn toggle_power(&mut self, on: bool) -> bool {
        self.active.store(on, Ordering::Release);
        self.send(if on { Command::PowerOn } else { Command::PowerOff })
    }
    pub fn request_log(&mut self) -> bool {
        self.send(Command::RequestLog)
    }
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
    /// Echoes `Sent: <cmd>` whether or not the write went through.
    /// Returns whether it did; failures are not retried.
    pub fn send(&mut self, command: Command) -> bool {
        let text = command.wire();
        let written = match self.sink.write_line(text) {
            Ok(()) => {
                info!("sent command {text:?}");
                true
            }
            Err(e) => {
                warn!("command {text:?} not delivered: {e}");
                self.tx
                    .send(MonitorMessage::Diagnostic(format!("Command {text} not delivered: {e}")))
                    .ok();
                false
            }
        };
        self.tx.send(MonitorMessage::ReplyLog(format!("Sent: {text}"))).ok();
        written
    }
}
