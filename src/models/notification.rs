use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "check-circle",
            Severity::Danger => "exclamation-circle",
            Severity::Warning => "exclamation-triangle",
            Severity::Info => "info-circle",
        }
    }
}

/// Transient user-facing status message. Each one is scheduled for removal
/// exactly once, after the configured delay.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub icon: &'static str,
}

impl Notification {
    pub fn new(id: u64, message: impl Into<String>, severity: Severity) -> Self {
        Notification {
            id,
            message: message.into(),
            severity,
            icon: severity.icon(),
        }
    }
}
