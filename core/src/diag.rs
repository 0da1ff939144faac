use serde::Serialize;

use crate::error::LookupError;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem reported back to the configuration engine, which decides how to show it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

pub type Diagnostics = Vec<Diagnostic>;

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Translates a failed lookup into diagnostics. When the remote service answered,
/// its response body becomes the detail so the user sees the server's own message.
pub fn from_error(e: &LookupError) -> Diagnostics {
    let detail = match e {
        LookupError::Request(failure) => failure.body.clone().unwrap_or_default(),
        _ => String::new(),
    };
    vec![Diagnostic::error(e.to_string(), detail)]
}
