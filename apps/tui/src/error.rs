use std::time::Duration;

use thiserror::Error;

use crate::domain::Operation;

/// Failure kinds surfaced by the trends gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrendsError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{} request failed{}: {message}", .operation.label(), .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },

    #[error("{} request timed out after {}s", .operation.label(), .after.as_secs())]
    Timeout {
        operation: Operation,
        after: Duration,
    },

    #[error("{} response was malformed: {message}", .operation.label())]
    DataIntegrity {
        operation: Operation,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Timeout,
    DataIntegrity,
}

impl TrendsError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn data_integrity(operation: Operation, message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            operation,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::DataIntegrity { .. } => ErrorKind::DataIntegrity,
        }
    }

    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Text for the status banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Please check the {field}: {message}")
            }
            Self::Transport {
                operation,
                status,
                message,
            } => {
                let status = status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
                format!(
                    "{} failed{status}: {message}. Please try again.",
                    operation.label()
                )
            }
            Self::Timeout { operation, .. } => {
                format!("{} timed out, try again.", operation.label())
            }
            Self::DataIntegrity { operation, .. } => {
                format!("{} returned data we could not read.", operation.label())
            }
        }
    }
}

/// Failures while loading the world topology.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to fetch topology from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("failed to parse topology: {0}")]
    Parse(String),

    #[error("topology contains no country polygons")]
    Empty,
}
