//! Error types for the traffic monitor.
//!
//! Signal handling itself never fails: faults are tallied by the state
//! machine. These errors only come from parsing and configuration at the
//! outer surface.

use thiserror::Error;

/// Errors that can occur while configuring or feeding the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Text does not name one of the vehicle categories.
    #[error("Unknown vehicle category: {0}")]
    UnknownCategory(String),

    /// Vehicle identifier is empty.
    #[error("Vehicle identifier must not be empty")]
    EmptyIdentifier,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl MonitorError {
    /// Create an unknown category error.
    #[must_use]
    pub fn unknown_category(text: impl Into<String>) -> Self {
        Self::UnknownCategory(text.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// A specialized `Result` type for monitor operations.
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
