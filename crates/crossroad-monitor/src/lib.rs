//! # crossroad-monitor
//!
//! Fixed-capacity vehicle counter for a single crossroad.
//!
//! Cameras deliver vehicle observations and fault signals. The monitor counts
//! each `(category, identifier)` pair, keeps two orderings over the live
//! records, tallies faults, and clears everything on a periodic schedule or
//! on request.
//!
//! ## Guarantees
//!
//! - **Bounded memory**: at most [`MAX_VEHICLES`] records, all slots created
//!   at construction
//! - **No failing signals**: bad input and exhaustion surface through the
//!   fault counter, never through an error
//! - **Serialized access**: every operation, reads included, runs under one
//!   lock, so statistics are always a consistent snapshot
//!
//! ## Architecture
//!
//! - [`pool`] - Fixed array of record slots with an O(1) free stack
//! - [`index`] - Per-category append order and global identifier order
//! - [`state`] - Init/Active/Error/Stopped machine, fault counter, reset deadline
//! - [`monitor`] - Thread-safe facade composing the three
//! - [`clock`] - Time sources for periodic reset evaluation
//! - [`config`] - Reset period configuration
//! - [`category`] - Vehicle categories
//! - [`error`] - Parsing and configuration errors
//!
//! Periodic reset is lazy: a reached deadline takes effect at the start of
//! the next vehicle or fault signal, or on [`TrafficMonitor::check_periodic_reset`].
//!
//! ## Example
//!
//! ```rust
//! use crossroad_monitor::prelude::*;
//! use std::time::Duration;
//!
//! let config = MonitorConfig::builder()
//!     .reset_period(Duration::from_secs(60))
//!     .build()?;
//! let monitor = TrafficMonitor::new(config);
//!
//! monitor.start();
//! monitor.signal_vehicle(VehicleCategory::Bicycle, "B1");
//! monitor.signal_vehicle(VehicleCategory::Bicycle, "B1");
//! monitor.signal_vehicle(VehicleCategory::Car, "C1");
//!
//! assert_eq!(monitor.statistics_all(), vec!["B1 - Bicycle (2)", "C1 - Car (1)"]);
//!
//! monitor.signal_fault();
//! assert_eq!(monitor.current_state(), MonitorState::Error);
//! assert_eq!(monitor.fault_count(), 1);
//! # Ok::<(), MonitorError>(())
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
pub mod clock;
pub mod config;
pub mod error;
pub mod index;
pub mod monitor;
pub mod pool;
pub mod state;

pub mod prelude;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;

pub use category::{CATEGORY_COUNT, VehicleCategory};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_RESET_PERIOD_MS, MAX_RESET_PERIOD_MS, MonitorConfig, MonitorConfigBuilder};
pub use error::{MonitorError, MonitorResult};
pub use index::DualIndex;
pub use monitor::{MonitorSnapshot, Signal, TrafficMonitor};
pub use pool::{MAX_VEHICLES, RecordPool, SlotId, VehicleRecord};
pub use state::{MonitorState, MonitorStateMachine};
