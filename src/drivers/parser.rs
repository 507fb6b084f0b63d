//! Classification and field extraction for device log lines.
//!
//! Telemetry records are free text tagged with [`MARKER`], carrying
//! comma-space separated fields such as `Speed=42%` and `Battery=7.4V`.
//! Field order is not fixed and unknown fields are ignored.
use crate::drivers::MonitorError;
/// Substring that tags a line as telemetry (case-sensitive).
pub const MARKER: &str = "PLOT DATA";
/// Separator between telemetry fields.
pub const SEPARATOR: &str = ", ";
const SPEED_KEY: &str = "Speed=";
const BATTERY_KEY: &str = "Battery=";
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Telemetry,
    Plain,
}
/// Numeric fields pulled out of one telemetry line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub speed: i32,
    pub battery: f64,
}
/// Inactive acquisition routes marker lines to the plain log.
pub fn classify(line: &str, active: bool) -> LineKind {
    if line.is_empty() {
        LineKind::Empty
    } else if active && line.contains(MARKER) {
        LineKind::Telemetry
    } else {
        LineKind::Plain
    }
}
pub fn parse_telemetry(line: &str) -> Result<Reading, MonitorError> {
    if !line.contains(MARKER) {
        return Err(MonitorError::MissingMarker);
    }
    let tokens: Vec<&str> = line.split(SEPARATOR).collect();
    let speed = field_payload(&tokens, SPEED_KEY, "Speed")?;
    let battery = field_payload(&tokens, BATTERY_KEY, "Battery")?;
    Ok(Reading {
        speed: parse_speed(speed)?,
        battery: parse_battery(battery)?,
    })
}
fn field_payload<'a>(
    tokens: &[&'a str],
    key: &str,
    field: &'static str,
) -> Result<&'a str, MonitorError> {
    let mut matches = tokens.iter().copied().filter(|t| t.contains(key));
    let token: &'a str = matches.next().ok_or(MonitorError::MissingField(field))?;
    if matches.next().is_some() {
        return Err(MonitorError::DuplicateField(field));
    }
    // The key guarantees at least one '='.
    let (_, payload) = token.split_once('=').unwrap_or_default();
    Ok(payload.trim())
}
fn parse_speed(payload: &str) -> Result<i32, MonitorError> {
    let digits = payload.strip_suffix('%').unwrap_or(payload).trim();
    digits.parse().map_err(|_| MonitorError::NonNumeric {
        field: "Speed",
        payload: payload.to_string(),
    })
}
fn parse_battery(payload: &str) -> Result<f64, MonitorError> {
    let number = payload.strip_suffix('V').unwrap_or(payload).trim();
    match number.parse::<f64>() {
        Ok(volts) if volts.is_finite() => Ok(volts),
        _ => Err(MonitorError::NonNumeric {
            field: "Battery",
            payload: payload.to_string(),
        }),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn classifies_by_marker_and_active_flag() {
        let line = "PLOT DATA, Speed=42%, Battery=7.4V";
        assert_eq!(classify(line, true), LineKind::Telemetry);
        assert_eq!(classify(line, false), LineKind::Plain);
        assert_eq!(classify("Motor ON", true), LineKind::Plain);
        assert_eq!(classify("plot data, Speed=1%", true), LineKind::Plain);
        assert_eq!(classify("", true), LineKind::Empty);
    }
    #[test]
    fn parses_reference_line() {
        let reading = parse_telemetry("PLOT DATA, Speed=42%, Battery=7.4V").unwrap();
        assert_eq!(reading.speed, 42);
        assert!((reading.battery - 7.4).abs() < 1e-9);
    }
    #[test]
    fn fields_may_appear_in_any_order_among_others() {
        let line = "[I][main] PLOT DATA, Temp=31C, Battery=6.95V, Mode=auto, Speed=100%";
        let reading = parse_telemetry(line).unwrap();
        assert_eq!(reading.speed, 100);
        assert!((reading.battery - 6.95).abs() < 1e-9);
    }
    #[test]
    fn rejects_non_numeric_payload() {
        let err = parse_telemetry("PLOT DATA, Speed=oops%, Battery=7.4V").unwrap_err();
        assert!(matches!(err, MonitorError::NonNumeric { field: "Speed", .. }));
        let err = parse_telemetry("PLOT DATA, Speed=5%, Battery=NaNV").unwrap_err();
        assert!(matches!(err, MonitorError::NonNumeric { field: "Battery", .. }));
    }
    #[test]
    fn rejects_missing_and_duplicate_fields() {
        assert!(matches!(
            parse_telemetry("PLOT DATA, Battery=7.4V"),
            Err(MonitorError::MissingField("Speed"))
        ));
        assert!(matches!(
            parse_telemetry("PLOT DATA, Speed=3%"),
            Err(MonitorError::MissingField("Battery"))
        ));
        assert!(matches!(
            parse_telemetry("PLOT DATA, Speed=3%, Speed=4%, Battery=7.4V"),
            Err(MonitorError::DuplicateField("Speed"))
        ));
        assert!(matches!(
            parse_telemetry("Speed=3%, Battery=7.4V"),
            Err(MonitorError::MissingMarker)
        ));
    }
    #[test]
    fn unit_suffixes_are_optional() {
        let reading = parse_telemetry("PLOT DATA, Speed=-5, Battery=12").unwrap();
        assert_eq!(reading.speed, -5);
        assert_eq!(reading.battery, 12.0);
    }
}
