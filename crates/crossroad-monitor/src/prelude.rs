//! Prelude for crossroad-monitor.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use crossroad_monitor::prelude::*;
//!
//! let monitor = TrafficMonitor::new(MonitorConfig::default());
//! monitor.start();
//! monitor.on_signal(Signal::vehicle(VehicleCategory::Scooter, "S7"));
//! assert_eq!(monitor.live_records(), 1);
//! ```

pub use crate::category::VehicleCategory;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{MonitorConfig, MonitorConfigBuilder};
pub use crate::error::{MonitorError, MonitorResult};
pub use crate::monitor::{MonitorSnapshot, Signal, TrafficMonitor};
pub use crate::state::MonitorState;
