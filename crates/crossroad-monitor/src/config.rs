//! Monitor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{MonitorError, MonitorResult};

/// Default periodic reset interval (10 minutes).
pub const DEFAULT_RESET_PERIOD_MS: u64 = 600_000;

/// Longest accepted periodic reset interval (one year).
pub const MAX_RESET_PERIOD_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Traffic monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval after which all data is cleared and the monitor reactivated
    /// (milliseconds). Zero resets on every signal.
    pub reset_period_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            reset_period_ms: DEFAULT_RESET_PERIOD_MS,
        }
    }
}

impl MonitorConfig {
    /// Configuration with the given reset period.
    #[must_use]
    pub fn with_reset_period(period: Duration) -> Self {
        Self {
            reset_period_ms: u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Periodic reset interval.
    #[must_use]
    pub fn reset_period(&self) -> Duration {
        Duration::from_millis(self.reset_period_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset period exceeds [`MAX_RESET_PERIOD_MS`].
    pub fn validate(&self) -> MonitorResult<()> {
        if self.reset_period_ms > MAX_RESET_PERIOD_MS {
            return Err(MonitorError::invalid_configuration(format!(
                "reset_period_ms must not exceed {MAX_RESET_PERIOD_MS}"
            )));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }
}

/// Builder for `MonitorConfig`.
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// Set the reset period.
    #[must_use]
    pub fn reset_period(mut self, period: Duration) -> Self {
        self.config.reset_period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the reset period in milliseconds.
    #[must_use]
    pub fn reset_period_ms(mut self, ms: u64) -> Self {
        self.config.reset_period_ms = ms;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> MonitorResult<MonitorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
