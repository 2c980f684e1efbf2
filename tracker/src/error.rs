use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service answered with status {0}")]
    Status(u16),
    #[error("invalid routing response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("routing service found no route (code {0})")]
    NoRoute(String),
    #[error("route geometry has {0} point(s), need at least 2")]
    DegenerateGeometry(usize),
    #[error("route geometry point {index} is out of range: lat {lat}, lon {lon}")]
    InvalidPoint { index: usize, lat: f64, lon: f64 },
    #[error("route distance or duration is not a finite non-negative number")]
    InvalidMetrics,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,
    #[error("permission to read the location was denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
    #[error("timed out waiting for a position fix")]
    Timeout,
    #[error("device reported an invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl LocationError {
    /// Maps a `GeolocationPositionError` code; 0 stands for a missing API.
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            0 => Self::Unsupported,
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::Unavailable(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("your location is needed first, allow location access and try again")]
    LocationUnknown,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("cannot export an empty route")]
    EmptyRoute,
}
