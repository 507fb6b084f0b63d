use std::fmt;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::time::Duration;
use log::{error, info, warn};
use serialport::SerialPort;
use crate::drivers::source::{Disconnected, LineSink, LineSource};
use crate::drivers::MonitorError;
/// What the link is attached to; shown in the status bar.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkStatus {
    Connected { port: String, baud_rate: u32 },
    Simulated,
    Disconnected { reason: String },
}
impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Connected { port, baud_rate } => write!(f, "Connected to {port} @ {baud_rate}"),
            LinkStatus::Simulated => write!(f, "Simulated device"),
            LinkStatus::Disconnected { reason } => write!(f, "No device ({reason})"),
        }
    }
}
/// A device link split into the half the acquisition thread reads from
/// and the half the UI writes commands to.
pub struct Link {
    pub source: Box<dyn LineSource>,
    pub sink: Box<dyn LineSink>,
    pub status: LinkStatus,
}
impl Link {
    pub fn open(address: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, MonitorError> {
        let connection_error = |source: serialport::Error| MonitorError::Connection {
            address: address.to_string(),
            source,
        };
        let port = serialport::new(address, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(connection_error)?;
        let write_port = port.try_clone().map_err(connection_error)?;
        info!("opened {address} @ {baud_rate} baud (read timeout {read_timeout:?})");
        Ok(Self {
            source: Box::new(SerialReader::new(address, port)),
            sink: Box::new(SerialWriter { port: write_port }),
            status: LinkStatus::Connected {
                port: address.to_string(),
                baud_rate,
            },
        })
    }
    /// A link whose reads idle and whose writes are refused.
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self {
            source: Box::new(Disconnected),
            sink: Box::new(Disconnected),
            status: LinkStatus::Disconnected {
                reason: reason.into(),
            },
        }
    }
    /// Opens the port, degrading to a disconnected link when that fails.
    pub fn open_or_disconnected(address: &str, baud_rate: u32, read_timeout: Duration) -> Self {
        match Self::open(address, baud_rate, read_timeout) {
            Ok(link) => link,
            Err(e) => {
                error!("{e}; continuing without a device");
                Self::disconnected(format!("{address} unavailable"))
            }
        }
    }
}
/// Byte count the driver has received but not yet handed out.
pub trait InputQueue {
    fn queued(&self) -> std::io::Result<u32>;
}
impl InputQueue for Box<dyn SerialPort> {
    fn queued(&self) -> std::io::Result<u32> {
        self.bytes_to_read().map_err(std::io::Error::from)
    }
}
/// Line reader over a serial port.
///
/// Bytes that arrive before a read timeout are kept in `pending` and
/// completed by the next call. After a hard I/O error the reader goes
/// quiet for good; there is no reconnect.
pub struct SerialReader<R = Box<dyn SerialPort>> {
    port_name: String,
    reader: Option<BufReader<R>>,
    pending: Vec<u8>,
}
impl<R: Read + InputQueue> SerialReader<R> {
    pub fn new(port_name: &str, port: R) -> Self {
        Self {
            port_name: port_name.to_string(),
            reader: Some(BufReader::new(port)),
            pending: Vec::new(),
        }
    }
    fn drop_port(&mut self, e: &std::io::Error) {
        error!("{}: {e}; link closed for the rest of the session", self.port_name);
        self.reader = None;
    }
}
impl<R: Read + InputQueue + Send> LineSource for SerialReader<R> {
    fn has_data(&mut self) -> bool {
        let Some(reader) = self.reader.as_ref() else {
            return false;
        };
        if !reader.buffer().is_empty() {
            return true;
        }
        match reader.get_ref().queued() {
            Ok(n) => n > 0,
            Err(e) => {
                warn!("{}: bytes_to_read failed: {e}", self.port_name);
                self.drop_port(&e);
                false
            }
        }
    }
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(Vec::new());
        };
        match reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => Ok(Vec::new()),
            Ok(_) => {
                let mut line = std::mem::take(&mut self.pending);
                while matches!(line.last(), Some(b'\n' | b'\r')) {
                    line.pop();
                }
                Ok(line)
            }
            // read_until leaves whatever it consumed in `pending`
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                Ok(Vec::new())
            }
            Err(e) => {
                self.drop_port(&e);
                Err(MonitorError::Io(e))
            }
        }
    }
}
pub struct SerialWriter<W = Box<dyn SerialPort>> {
    port: W,
}
impl<W: Write + Send> LineSink for SerialWriter<W> {
    fn write_line(&mut self, text: &str) -> Result<(), MonitorError> {
        let framed = format!("{text}\n");
        self.port
            .write_all(framed.as_bytes())
            .and_then(|_| self.port.flush())
            .map_err(|source| MonitorError::Write {
                command: text.to_string(),
                source,
            })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    #[test]
    fn missing_port_degrades_to_disconnected_link() {
        let mut link = Link::open_or_disconnected(
            "/dev/definitely-not-a-port",
            9600,
            Duration::from_millis(10),
        );
        assert!(matches!(link.status, LinkStatus::Disconnected { .. }));
        assert!(!link.source.has_data());
        assert!(link.source.read_line().unwrap().is_empty());
        assert!(matches!(
            link.sink.write_line("1"),
            Err(MonitorError::Disconnected)
        ));
    }
    #[test]
    fn open_reports_connection_error() {
        let err = Link::open("/dev/definitely-not-a-port", 9600, Duration::from_millis(10))
            .err()
            .unwrap();
        assert!(matches!(err, MonitorError::Connection { .. }));
    }
    /// Replays a fixed sequence of read results, one per `read` call.
    struct ScriptedPort {
        script: VecDeque<std::io::Result<Vec<u8>>>,
    }
    impl ScriptedPort {
        fn new(script: impl IntoIterator<Item = std::io::Result<Vec<u8>>>) -> Self {
            Self {
                script: script.into_iter().collect(),
            }
        }
    }
    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.script.pop_front() {
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                Some(Err(e)) => Err(e),
                None => Err(std::io::Error::from(ErrorKind::TimedOut)),
            }
        }
    }
    impl InputQueue for ScriptedPort {
        fn queued(&self) -> std::io::Result<u32> {
            Ok(self.script.len() as u32)
        }
    }
    fn timed_out() -> std::io::Result<Vec<u8>> {
        Err(std::io::Error::from(ErrorKind::TimedOut))
    }
    #[test]
    fn partial_line_survives_a_read_timeout() {
        let mut reader = SerialReader::new(
            "scripted",
            ScriptedPort::new([
                Ok(b"PLOT DATA, Spe".to_vec()),
                timed_out(),
                Ok(b"ed=1%, Battery=7.0V\r\n".to_vec()),
            ]),
        );
        assert!(reader.has_data());
        assert!(reader.read_line().unwrap().is_empty());
        assert_eq!(
            reader.read_line().unwrap(),
            b"PLOT DATA, Speed=1%, Battery=7.0V".to_vec()
        );
    }
    #[test]
    fn lines_are_split_and_stripped() {
        let mut reader = SerialReader::new(
            "scripted",
            ScriptedPort::new([Ok(b"Motor ON\r\nLOG: a\n".to_vec())]),
        );
        assert_eq!(reader.read_line().unwrap(), b"Motor ON".to_vec());
        assert!(reader.has_data());
        assert_eq!(reader.read_line().unwrap(), b"LOG: a".to_vec());
        // nothing left: the next read times out empty
        assert!(reader.read_line().unwrap().is_empty());
    }
    #[test]
    fn hard_error_closes_the_reader() {
        let mut reader = SerialReader::new(
            "scripted",
            ScriptedPort::new([
                Err(std::io::Error::from(ErrorKind::BrokenPipe)),
                Ok(b"late line\n".to_vec()),
            ]),
        );
        assert!(matches!(reader.read_line(), Err(MonitorError::Io(_))));
        assert!(!reader.has_data());
        assert!(reader.read_line().unwrap().is_empty());
    }
    #[test]
    fn writer_terminates_each_command_with_newline() {
        let mut writer = SerialWriter { port: Vec::<u8>::new() };
        writer.write_line("1").unwrap();
        writer.write_line("R").unwrap();
        assert_eq!(writer.port, b"1\nR\n".to_vec());
    }
    struct RefusingPort;
    impl Write for RefusingPort {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
    #[test]
    fn write_failure_names_the_command() {
        let mut writer = SerialWriter { port: RefusingPort };
        let err = writer.write_line("0").unwrap_err();
        assert!(matches!(err, MonitorError::Write { ref command, .. } if command == "0"));
    }
}
