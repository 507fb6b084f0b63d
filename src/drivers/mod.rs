// src/drivers/mod.rs
pub mod buffer;
pub mod command;
pub mod error;
pub mod link;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod scheduler;
pub mod simulator;
pub mod source;
pub use buffer::{Sample, SharedBuffer, TelemetryFrame};
pub use command::CommandSender;
pub use error::MonitorError;
pub use link::{Link, LinkStatus};
pub use pipeline::{AcquisitionPipeline, PumpOutcome};
pub use plot::{render_telemetry_png, PlotStyle};
pub use scheduler::{PlotSink, RedrawScheduler};
pub use simulator::SimulatedDevice;
pub use source::{LineSink, LineSource};
#[cfg(test)]
pub use scheduler::RecordingPlotSink;
#[cfg(test)]
pub use source::ManualSource;
