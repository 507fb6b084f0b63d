// src/types.rs
use serde::Deserialize;

// Where the link comes from
#[derive(PartialEq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    #[default]
    Hardware,
    Simulation,
}

// Messages from the background side to the GUI
#[derive(Clone, Debug, PartialEq)]
pub enum MonitorMessage {
    PlotLog(String),    // "Received Plot Data" view
    ReplyLog(String),   // "Command Replies / Log Data" view
    Diagnostic(String), // parse / decode / link problems
}
