use std::sync::{Arc, PoisonError, RwLock};
/// One accepted telemetry point. `index` is its position in the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub speed: i32,
    pub battery: f64,
}
/// Plot-ready view of a buffer snapshot: three aligned columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryFrame {
    pub x: Vec<f64>,
    pub speed: Vec<f64>,
    pub battery: Vec<f64>,
}
impl TelemetryFrame {
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self {
            x: samples.iter().map(|s| s.index as f64).collect(),
            speed: samples.iter().map(|s| s.speed as f64).collect(),
            battery: samples.iter().map(|s| s.battery).collect(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
/// Append-only sample store for one session. Never truncated or reordered.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
}
impl SampleBuffer {
    pub fn append(&mut self, speed: i32, battery: f64) -> Sample {
        let sample = Sample {
            index: self.samples.len(),
            speed,
            battery,
        };
        self.samples.push(sample);
        debug_assert_eq!(self.samples[sample.index].index, sample.index);
        sample
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}
/// Handle shared between the acquisition thread (sole writer) and the UI.
///
/// Index assignment and push happen under one write lock, so readers
/// only ever see whole samples.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    inner: Arc<RwLock<SampleBuffer>>,
}
impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn append(&self, speed: i32, battery: f64) -> Sample {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .append(speed, battery)
    }
    pub fn snapshot(&self) -> Vec<Sample> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .samples()
            .to_vec()
    }
    pub fn frame(&self) -> TelemetryFrame {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        TelemetryFrame::from_samples(guard.samples())
    }
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
