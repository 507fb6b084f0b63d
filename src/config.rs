// src/config.rs
use crate::drivers::MonitorError;
use crate::types::ConnectionMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Startup settings. Every field has a default, so an empty JSON object
/// (or no file at all) gives the stock COM11 / 9600 setup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub redraw_period_ms: u64,
    pub idle_poll_ms: u64,
    pub mode: ConnectionMode,
    /// Telemetry rate of the simulated device.
    pub simulation_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: "COM11".to_owned(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
            redraw_period_ms: 2000,
            idle_poll_ms: 10,
            mode: ConnectionMode::Hardware,
            simulation_interval_ms: 250,
        }
    }
}

impl MonitorConfig {
    pub fn from_json(text: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// A zero period would spin the acquisition loop or redraw every frame.
    fn validate(&self) -> Result<(), MonitorError> {
        let settings = [
            ("baud_rate", u64::from(self.baud_rate)),
            ("redraw_period_ms", self.redraw_period_ms),
            ("idle_poll_ms", self.idle_poll_ms),
            ("simulation_interval_ms", self.simulation_interval_ms),
        ];
        match settings.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(MonitorError::ZeroSetting(*name)),
            None => Ok(()),
        }
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        use anyhow::Context;
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
    pub fn redraw_period(&self) -> Duration {
        Duration::from_millis(self.redraw_period_ms)
    }
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = MonitorConfig::from_json("{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.redraw_period(), Duration::from_secs(2));
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn partial_override() {
        let config =
            MonitorConfig::from_json(r#"{"port": "/dev/ttyUSB0", "baud_rate": 115200, "mode": "simulation"}"#)
                .unwrap();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.mode, ConnectionMode::Simulation);
        assert_eq!(config.idle_poll_ms, 10);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            MonitorConfig::from_json(r#"{"prot": "COM3"}"#),
            Err(MonitorError::Config(_))
        ));
    }

    #[test]
    fn rejects_zero_periods() {
        assert!(matches!(
            MonitorConfig::from_json(r#"{"idle_poll_ms": 0}"#),
            Err(MonitorError::ZeroSetting("idle_poll_ms"))
        ));
        assert!(matches!(
            MonitorConfig::from_json(r#"{"redraw_period_ms": 0}"#),
            Err(MonitorError::ZeroSetting("redraw_period_ms"))
        ));
        assert!(MonitorConfig::from_json(r#"{"read_timeout_ms": 0}"#).is_ok());
    }

    #[test]
    fn zero_setting_in_a_file_fails_to_load() {
        let path = std::env::temp_dir().join(format!("esp-monitor-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"idle_poll_ms": 0}"#).unwrap();
        let result = MonitorConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("idle_poll_ms must be greater than zero"));
    }

    #[test]
    fn missing_path_is_defaults_but_missing_file_is_an_error() {
        assert_eq!(MonitorConfig::load(None).unwrap(), MonitorConfig::default());
        assert!(MonitorConfig::load(Some(Path::new("/nonexistent/monitor.json"))).is_err());
    }
}
