use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use crate::drivers::{SharedBuffer, TelemetryFrame};
pub const SPEED_SERIES: &str = "Speed (%)";
pub const BATTERY_SERIES: &str = "Battery (V)";
/// Anything that can display a named x/y series.
pub trait PlotSink {
    fn set_series(&mut self, name: &str, x: &[f64], y: &[f64]);
}
/// Periodic consumer of the sample buffer. Never writes to it.
pub struct RedrawScheduler {
    buffer: SharedBuffer,
    active: Arc<AtomicBool>,
    period: Duration,
    last_fired: Option<Instant>,
}
impl RedrawScheduler {
    pub fn new(buffer: SharedBuffer, active: Arc<AtomicBool>, period: Duration) -> Self {
        Self {
            buffer,
            active,
            period,
            last_fired: None,
        }
    }
    /// When the next firing is due.
    pub fn next_due(&self, now: Instant) -> Instant {
        self.last_fired.map_or(now, |at| at + self.period)
    }
    /// Fires at most once per period. Returns whether series were pushed.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn PlotSink) -> bool {
        if now < self.next_due(now) {
            return false;
        }
        self.last_fired = Some(now);
        self.redraw(sink)
    }
    /// One unconditional firing: pushes both series unless inactive or empty.
    pub fn redraw(&self, sink: &mut dyn PlotSink) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        let samples = self.buffer.snapshot();
        if samples.is_empty() {
            return false;
        }
        let frame = TelemetryFrame::from_samples(&samples);
        sink.set_series(SPEED_SERIES, &frame.x, &frame.speed);
        sink.set_series(BATTERY_SERIES, &frame.x, &frame.battery);
        true
    }
}
/// Keeps every push, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingPlotSink {
    pub pushes: Vec<(String, Vec<f64>, Vec<f64>)>,
}
#[cfg(test)]
impl PlotSink for RecordingPlotSink {
    fn set_series(&mut self, name: &str, x: &[f64], y: &[f64]) {
        self.pushes.push((name.to_string(), x.to_vec(), y.to_vec()));
    }
}
