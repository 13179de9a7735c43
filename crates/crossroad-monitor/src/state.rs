//! Supervising state machine.
//!
//! Decides whether a signal is counted, ignored or tallied as a fault, owns
//! the fault counter and the deadline of the next periodic reset.
//!
//! ```text
//!            Start                  error signal
//!  ┌──────┐ ───────► ┌────────┐ ──────────────► ┌───────┐
//!  │ Init │          │ Active │                 │ Error │ ◄─┐ error signal
//!  └──────┘          └────────┘                 └───────┘ ──┘
//!                       │  ▲
//!                  Stop │  │ Reset (manual or periodic, from any state)
//!                       ▼  │
//!                    ┌─────────┐
//!                    │ Stopped │  (periodic reset suppressed)
//!                    └─────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Monitor operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum MonitorState {
    /// Constructed but not started; signals are ignored.
    #[default]
    Init,
    /// Counting vehicles.
    Active,
    /// Faulted; every signal increments the fault counter.
    Error,
    /// Stopped; signals are ignored and periodic reset is suppressed.
    Stopped,
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorState::Init => write!(f, "Init"),
            MonitorState::Active => write!(f, "Active"),
            MonitorState::Error => write!(f, "Error"),
            MonitorState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// What caused a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetTrigger {
    /// Explicit reset call or reset signal.
    Manual,
    /// Reset deadline reached.
    Periodic,
}

impl std::fmt::Display for ResetTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetTrigger::Manual => write!(f, "manual"),
            ResetTrigger::Periodic => write!(f, "periodic"),
        }
    }
}

/// How a vehicle signal is to be handled in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleGate {
    /// Drop the signal without touching any counter.
    Ignore,
    /// Count the signal as a fault, do not record the vehicle.
    CountAsFault,
    /// Record the vehicle.
    Count,
}

/// Result of an explicit fault signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// State was `Init` or `Stopped`; nothing changed.
    Ignored,
    /// `Active` moved to `Error`.
    EnteredError,
    /// Already in `Error`; only the counter moved.
    Repeated,
}

/// State, fault counter and reset schedule of one monitor.
#[derive(Debug, Clone)]
pub struct MonitorStateMachine {
    state: MonitorState,
    fault_count: u32,
    period: Duration,
    next_reset: Option<Instant>,
}

impl MonitorStateMachine {
    /// Create a machine in `Init` with the first deadline one period from `now`.
    #[must_use]
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            state: MonitorState::Init,
            fault_count: 0,
            period,
            next_reset: now.checked_add(period),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Faults tallied in the current reset epoch.
    #[must_use]
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    /// Periodic reset interval.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant at which the next periodic reset becomes due.
    ///
    /// `None` only if `now + period` overflows the platform's `Instant`.
    #[must_use]
    pub fn next_reset(&self) -> Option<Instant> {
        self.next_reset
    }

    fn schedule_next_reset(&mut self, now: Instant) {
        self.next_reset = now.checked_add(self.period);
    }

    /// `Init` → `Active`, rescheduling the deadline. No-op in any other state.
    ///
    /// Returns `true` if the state changed.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != MonitorState::Init {
            return false;
        }
        self.state = MonitorState::Active;
        self.schedule_next_reset(now);
        true
    }

    /// `Active` → `Stopped`. No-op in any other state.
    ///
    /// Returns `true` if the state changed.
    pub fn stop(&mut self) -> bool {
        if self.state != MonitorState::Active {
            return false;
        }
        self.state = MonitorState::Stopped;
        true
    }

    /// Force `Active` from any state, clear the fault counter and reschedule.
    ///
    /// Releasing the records is left to the caller.
    pub fn reset(&mut self, now: Instant) {
        self.state = MonitorState::Active;
        self.fault_count = 0;
        self.schedule_next_reset(now);
    }

    /// Check whether a periodic reset is due at `now`.
    ///
    /// Never due while `Stopped`; otherwise due once the deadline is reached,
    /// including in `Init`.
    #[must_use]
    pub fn is_reset_due(&self, now: Instant) -> bool {
        self.state != MonitorState::Stopped && self.next_reset.is_some_and(|deadline| now >= deadline)
    }

    /// Apply an explicit fault signal.
    pub fn on_fault(&mut self) -> FaultOutcome {
        match self.state {
            MonitorState::Init | MonitorState::Stopped => FaultOutcome::Ignored,
            MonitorState::Active => {
                self.record_fault();
                self.state = MonitorState::Error;
                FaultOutcome::EnteredError
            }
            MonitorState::Error => {
                self.record_fault();
                FaultOutcome::Repeated
            }
        }
    }

    /// Decide how a vehicle signal is handled in the current state.
    #[must_use]
    pub fn vehicle_gate(&self) -> VehicleGate {
        match self.state {
            MonitorState::Init | MonitorState::Stopped => VehicleGate::Ignore,
            MonitorState::Error => VehicleGate::CountAsFault,
            MonitorState::Active => VehicleGate::Count,
        }
    }

    /// Increment the fault counter without changing state.
    pub fn record_fault(&mut self) {
        self.fault_count = self.fault_count.saturating_add(1);
    }
}
