use std::fmt;

#[derive(Debug)]
pub enum DashboardError {
    Http(reqwest::Error),
    Parse(String),
    Config(String),
    ServiceUnavailable,
    InvalidResponse(String),
    NoSource,
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Parse(e) => write!(f, "JSON parse error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::ServiceUnavailable => write!(f, "Service temporarily unavailable (503)"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Self::NoSource => write!(f, "No route data source configured"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.status() == Some(reqwest::StatusCode::SERVICE_UNAVAILABLE) {
            Self::ServiceUnavailable
        } else {
            Self::Http(e)
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
