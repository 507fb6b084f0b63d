use thiserror::Error;
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to open serial port {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial link is not connected")]
    Disconnected,
    #[error("serial read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("line is not valid text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error("line does not carry the telemetry marker")]
    MissingMarker,
    #[error("telemetry line has no {0} field")]
    MissingField(&'static str),
    #[error("telemetry line has more than one {0} field")]
    DuplicateField(&'static str),
    #[error("{field} payload {payload:?} is not a number")]
    NonNumeric {
        field: &'static str,
        payload: String,
    },
    #[error("failed to write command {command:?}: {source}")]
    Write {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid configuration: {0} must be greater than zero")]
    ZeroSetting(&'static str),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for MonitorError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        MonitorError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for MonitorError {
    fn from(value: image::ImageError) -> Self {
        MonitorError::Plot(value.to_string())
    }
}
