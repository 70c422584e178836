// SPDX-License-Identifier: MIT

//! Typed error handling for kernel-debug-rs
//!
//! Parsing failures and buffer precondition failures have their own enums so
//! callers of `parse` or `check_ready` get a precise type. `DebugError` wraps
//! both for the gate, the launcher and the config loader.

use thiserror::Error;

/// Top-level error type for kernel-debug-rs
#[derive(Debug, Error)]
pub enum DebugError {
    /// Malformed condition string
    #[error("Invalid condition: {0}")]
    Validation(#[from] ValidationError),

    /// Buffer not ready for a kernel launch
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Configuration errors (bad grid, unreadable config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// An invocation task panicked or was cancelled
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Condition string errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Fragment does not start with a known operator
    #[error(
        "Rules may only use these ops: '<', '>', '>=', '<=', '=', '!='. Invalid rule '{fragment}' in '{condition}'"
    )]
    UnknownOperator { fragment: String, condition: String },

    /// Operator is fine but the remainder is not an integer
    #[error("Threshold of rule '{fragment}' in '{condition}' is not an integer")]
    InvalidThreshold { fragment: String, condition: String },

    /// More positions than grid axes
    #[error("Condition '{condition}' has {count} positions, at most 3 axes are supported")]
    TooManyPositions { count: usize, condition: String },
}

/// Buffer readiness errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Buffer '{buffer}' is not contiguous")]
    NotContiguous { buffer: String },

    #[error("Buffer '{buffer}' is on {device}, expected a GPU")]
    NotOnDevice { buffer: String, device: String },
}

pub type DebugResult<T> = Result<T, DebugError>;

impl DebugError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl ValidationError {
    /// The full condition string that failed to parse
    pub fn condition(&self) -> &str {
        match self {
            Self::UnknownOperator { condition, .. }
            | Self::InvalidThreshold { condition, .. }
            | Self::TooManyPositions { condition, .. } => condition,
        }
    }
}
