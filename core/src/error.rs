use std::{error::Error, fmt, result};

pub type Result<T, E = LookupError> = result::Result<T, E>;

/// Everything known about a failed call to the remote service. `status` and `body`
/// are only set when the service actually answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub message: String,
}

impl RequestFailure {
    /// The request never produced a response (connection refused, timeout, bad url...)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// The service answered, but not with something we can use.
    pub fn response(status: u16, body: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug)]
pub enum LookupError {
    Internal(String),
    Config(String),
    InvalidConfig(String),
    SerDe(String),
    Request(RequestFailure),
    NoMatch,
}

impl Error for LookupError {}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LookupError::Internal(s) => write!(f, "Unexpected internal error: {}", s),
            LookupError::Config(s) => write!(f, "Configuration error: {}", s),
            LookupError::InvalidConfig(s) => write!(f, "Invalid data source configuration: {}", s),
            LookupError::SerDe(s) => write!(f, "SerDe related error: {}", s),
            LookupError::Request(r) => write!(f, "Request to remote service failed: {}", r),
            LookupError::NoMatch => write!(f, "No matching mappings found"),
        }
    }
}

impl From<RequestFailure> for LookupError {
    fn from(e: RequestFailure) -> Self {
        LookupError::Request(e)
    }
}

impl From<url::ParseError> for LookupError {
    fn from(e: url::ParseError) -> Self {
        LookupError::Request(RequestFailure::transport(format!("invalid url: {e}")))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::SerDe(e.to_string())
    }
}

impl From<std::io::Error> for LookupError {
    fn from(e: std::io::Error) -> Self {
        LookupError::Config(e.to_string())
    }
}
