// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod config;
mod drivers;
mod engine;
mod gui;
mod types;
use anyhow::{anyhow, Context};
use config::MonitorConfig;
use drivers::{
    AcquisitionPipeline, CommandSender, Link, LinkStatus, RedrawScheduler, SharedBuffer,
    SimulatedDevice,
};
use eframe::egui;
use log::info;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::channel;
use std::sync::Arc;
use types::{ConnectionMode, MonitorMessage};

fn open_link(config: &MonitorConfig) -> Link {
    match config.mode {
        ConnectionMode::Hardware => {
            Link::open_or_disconnected(&config.port, config.baud_rate, config.read_timeout())
        }
        ConnectionMode::Simulation => {
            info!("running against a simulated device");
            SimulatedDevice::new(config.simulation_interval()).into_link()
        }
    }
}

// Entry point: optional first argument is a JSON config file
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = MonitorConfig::load(config_path.as_deref())?;
    info!("starting with {config:?}");

    let (tx, rx) = channel();
    let buffer = SharedBuffer::new();
    let active = Arc::new(AtomicBool::new(false));

    let Link { source, sink, status } = open_link(&config);
    if let LinkStatus::Disconnected { reason } = &status {
        tx.send(MonitorMessage::Diagnostic(format!("Failed to open serial port: {reason}")))
            .ok();
    }

    let pipeline = AcquisitionPipeline::new(source, buffer.clone(), active.clone(), tx.clone());
    engine::spawn_acquisition(pipeline, config.idle_poll())
        .context("failed to start the acquisition thread")?;

    let commands = CommandSender::new(sink, active.clone(), tx);
    let scheduler = RedrawScheduler::new(buffer.clone(), active, config.redraw_period());
    let app = gui::MonitorApp::new(status, scheduler, commands, buffer, rx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("ESP Debugging GUI"),
        ..Default::default()
    };
    eframe::run_native("ESP Debugging GUI", options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow!("GUI exited with an error: {e}"))
}
