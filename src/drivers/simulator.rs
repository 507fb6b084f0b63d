//! Stand-in for the ESP board, for running the monitor without hardware.
//!
//! Answers the same commands as the firmware: `1` starts the motor and a
//! stream of `PLOT DATA` lines, `0` stops it, `R` dumps a short log.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::drivers::link::{Link, LinkStatus};
use crate::drivers::source::{LineSink, LineSource};
use crate::drivers::MonitorError;
struct DeviceState {
    outbox: VecDeque<String>,
    running: bool,
    next_emit: Instant,
    booted_at: Instant,
    emitted: u64,
    speed: i32,
    battery: f64,
    rng: StdRng,
}
/// Both link halves share one device; clones refer to the same board.
#[derive(Clone)]
pub struct SimulatedDevice {
    state: Arc<Mutex<DeviceState>>,
    interval: Duration,
}
impl SimulatedDevice {
    pub fn new(interval: Duration) -> Self {
        Self::with_rng(interval, StdRng::from_entropy())
    }
    fn with_rng(interval: Duration, rng: StdRng) -> Self {
        let now = Instant::now();
        let state = DeviceState {
            outbox: VecDeque::from(vec!["ESP32 ready".to_owned()]),
            running: false,
            next_emit: now,
            booted_at: now,
            emitted: 0,
            speed: 0,
            battery: 8.4,
            rng,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            interval: interval.max(Duration::from_millis(1)),
        }
    }
    pub fn into_link(self) -> Link {
        Link {
            source: Box::new(self.clone()),
            sink: Box::new(self),
            status: LinkStatus::Simulated,
        }
    }
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
impl DeviceState {
    fn emit_due(&mut self, now: Instant, interval: Duration) {
        while self.running && self.next_emit <= now {
            let target = self.rng.gen_range(30..=100);
            self.speed += (target - self.speed) / 4;
            self.battery = (self.battery - 0.002 + self.rng.gen_range(-0.01..0.01)).clamp(6.0, 8.4);
            self.outbox.push_back(format!(
                "PLOT DATA, Speed={}%, Battery={:.2}V",
                self.speed, self.battery
            ));
            self.emitted += 1;
            self.next_emit += interval;
        }
    }
}
impl LineSource for SimulatedDevice {
    fn has_data(&mut self) -> bool {
        let interval = self.interval;
        let mut state = self.lock();
        state.emit_due(Instant::now(), interval);
        !state.outbox.is_empty()
    }
    fn read_line(&mut self) -> Result<Vec<u8>, MonitorError> {
        Ok(self
            .lock()
            .outbox
            .pop_front()
            .map(String::into_bytes)
            .unwrap_or_default())
    }
}
impl LineSink for SimulatedDevice {
    fn write_line(&mut self, text: &str) -> Result<(), MonitorError> {
        let mut state = self.lock();
        match text.trim() {
            "1" => {
                state.running = true;
                state.next_emit = Instant::now();
                state.outbox.push_back("Motor ON".to_owned());
            }
            "0" => {
                state.running = false;
                state.speed = 0;
                state.outbox.push_back("Motor OFF".to_owned());
            }
            "R" => {
                let uptime = state.booted_at.elapsed().as_secs();
                let lines = [
                    format!("LOG: uptime={uptime}s"),
                    format!("LOG: samples sent={}", state.emitted),
                    format!("LOG: battery={:.2}V", state.battery),
                ];
                state.outbox.extend(lines);
            }
            other => state.outbox.push_back(format!("ERR: unknown command {other}")),
        }
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::parser::parse_telemetry;
    fn seeded(interval: Duration, seed: u64) -> SimulatedDevice {
        SimulatedDevice::with_rng(interval, StdRng::seed_from_u64(seed))
    }
    fn drain(device: &mut SimulatedDevice) -> Vec<String> {
        let mut lines = Vec::new();
        while device.has_data() {
            lines.push(String::from_utf8(device.read_line().unwrap()).unwrap());
        }
        lines
    }
    #[test]
    fn quiet_until_powered_on() {
        let mut device = seeded(Duration::from_secs(3600), 7);
        assert_eq!(drain(&mut device), vec!["ESP32 ready".to_string()]);
        assert!(drain(&mut device).is_empty());
    }
    #[test]
    fn power_on_streams_parseable_telemetry() {
        let mut device = seeded(Duration::from_secs(3600), 7);
        drain(&mut device);
        device.write_line("1").unwrap();
        let lines = drain(&mut device);
        assert_eq!(lines[0], "Motor ON");
        let reading = parse_telemetry(&lines[1]).unwrap();
        assert!((0..=100).contains(&reading.speed));
        assert!((6.0..=8.4).contains(&reading.battery));
        device.write_line("0").unwrap();
        assert_eq!(drain(&mut device), vec!["Motor OFF".to_string()]);
    }
    #[test]
    fn log_request_replies_without_telemetry() {
        let mut device = seeded(Duration::from_millis(1), 1);
        drain(&mut device);
        device.write_line("R").unwrap();
        let lines = drain(&mut device);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with("LOG: ")));
    }
}
