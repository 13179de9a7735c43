//! Thread-safe traffic monitor.
//!
//! `TrafficMonitor` composes the record pool, the dual index and the state
//! machine behind a single [`parking_lot::Mutex`]. Every public operation,
//! including the read-only ones, holds that lock for its full duration and
//! reads the clock inside it.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::Instant;

use crate::category::VehicleCategory;
use crate::clock::{Clock, SystemClock};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::index::DualIndex;
use crate::pool::{MAX_VEHICLES, RecordPool};
use crate::state::{FaultOutcome, MonitorState, MonitorStateMachine, ResetTrigger, VehicleGate};

/// Input delivered to [`TrafficMonitor::on_signal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A camera observed a vehicle.
    Vehicle {
        /// Category of the vehicle.
        category: VehicleCategory,
        /// Opaque identifier, compared bytewise.
        id: String,
    },
    /// A camera reported an empty or broken frame.
    Fault,
    /// External request to clear all data and reactivate.
    Reset,
}

impl Signal {
    /// Build a vehicle signal.
    #[must_use]
    pub fn vehicle(category: VehicleCategory, id: impl Into<String>) -> Self {
        Signal::Vehicle {
            category,
            id: id.into(),
        }
    }

    /// Parse a vehicle signal from operator text.
    ///
    /// The category is matched case-insensitively and the identifier is
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::UnknownCategory`] for an unrecognised category
    /// and [`MonitorError::EmptyIdentifier`] for a blank identifier.
    pub fn parse_vehicle(category: &str, id: &str) -> MonitorResult<Self> {
        let category: VehicleCategory = category.parse()?;
        let id = id.trim();
        if id.is_empty() {
            return Err(MonitorError::EmptyIdentifier);
        }
        Ok(Self::vehicle(category, id))
    }
}

/// Point-in-time view of a monitor, taken under the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    /// State at the time of the snapshot.
    pub state: MonitorState,
    /// Faults in the current reset epoch.
    pub fault_count: u32,
    /// Maximum number of records.
    pub capacity: usize,
    /// Statistics lines in global identifier order.
    pub lines: Vec<String>,
}

/// How one signal was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Ignored,
    Counted,
    Recorded,
    CameraFault,
    CountedAsFault,
    CapacityExhausted,
}

#[derive(Debug)]
struct MonitorCore {
    machine: MonitorStateMachine,
    pool: RecordPool<MAX_VEHICLES>,
    index: DualIndex<MAX_VEHICLES>,
}

impl MonitorCore {
    fn new(config: &MonitorConfig, now: Instant) -> Self {
        Self {
            machine: MonitorStateMachine::new(config.reset_period(), now),
            pool: RecordPool::new(),
            index: DualIndex::new(),
        }
    }

    fn reset(&mut self, now: Instant, trigger: ResetTrigger) {
        let previous = self.machine.state();
        let released = self.index.remove_all(&mut self.pool);
        self.machine.reset(now);

        tracing::info!(
            trigger = %trigger,
            released = released,
            previous = %previous,
            "Traffic monitor reset"
        );
    }

    fn apply_periodic_reset(&mut self, now: Instant) -> bool {
        if !self.machine.is_reset_due(now) {
            return false;
        }
        self.reset(now, ResetTrigger::Periodic);
        true
    }

    fn fault(&mut self) -> Disposition {
        match self.machine.on_fault() {
            FaultOutcome::Ignored => Disposition::Ignored,
            FaultOutcome::EnteredError | FaultOutcome::Repeated => Disposition::CameraFault,
        }
    }

    fn vehicle(&mut self, category: VehicleCategory, id: &str) -> Disposition {
        match self.machine.vehicle_gate() {
            VehicleGate::Ignore => Disposition::Ignored,
            VehicleGate::CountAsFault => {
                self.machine.record_fault();
                Disposition::CountedAsFault
            }
            VehicleGate::Count => self.count_vehicle(category, id),
        }
    }

    fn count_vehicle(&mut self, category: VehicleCategory, id: &str) -> Disposition {
        if let Some(slot) = self.index.find(&self.pool, category, id) {
            if let Some(record) = self.pool.get_mut(slot) {
                record.increment();
            }
            return Disposition::Counted;
        }

        let Some(slot) = self.pool.acquire(category, id) else {
            self.machine.record_fault();
            return Disposition::CapacityExhausted;
        };
        if self.index.insert(&self.pool, slot) {
            return Disposition::Recorded;
        }

        self.pool.release(slot);
        self.machine.record_fault();
        Disposition::CapacityExhausted
    }

    fn log_vehicle(&self, disposition: Disposition, category: VehicleCategory, id: &str) {
        let fault_count = self.machine.fault_count();
        match disposition {
            Disposition::Ignored => {
                tracing::debug!(
                    category = %category,
                    id = id,
                    state = %self.machine.state(),
                    "Vehicle signal ignored"
                );
            }
            Disposition::Counted | Disposition::Recorded => {
                tracing::trace!(category = %category, id = id, "Vehicle counted");
            }
            Disposition::CountedAsFault => {
                tracing::warn!(
                    category = %category,
                    id = id,
                    fault_count = fault_count,
                    "Vehicle signal received in Error state"
                );
            }
            Disposition::CapacityExhausted => {
                tracing::warn!(
                    category = %category,
                    id = id,
                    fault_count = fault_count,
                    "Vehicle capacity exhausted"
                );
            }
            Disposition::CameraFault => {}
        }
    }

    fn log_fault(&self, disposition: Disposition) {
        match disposition {
            Disposition::CameraFault => {
                tracing::warn!(
                    fault_count = self.machine.fault_count(),
                    "Camera fault signal received"
                );
            }
            _ => {
                tracing::debug!(state = %self.machine.state(), "Camera fault signal ignored");
            }
        }
    }

    fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            state: self.machine.state(),
            fault_count: self.machine.fault_count(),
            capacity: self.pool.capacity(),
            lines: self.index.snapshot_all(&self.pool),
        }
    }
}

/// Fixed-capacity vehicle counter for one crossroad.
///
/// ```rust
/// use crossroad_monitor::prelude::*;
///
/// let monitor = TrafficMonitor::new(MonitorConfig::default());
/// monitor.start();
/// monitor.signal_vehicle(VehicleCategory::Car, "C1");
/// monitor.signal_vehicle(VehicleCategory::Car, "C1");
///
/// assert_eq!(monitor.statistics_all(), vec!["C1 - Car (2)"]);
/// assert_eq!(monitor.current_state(), MonitorState::Active);
/// ```
pub struct TrafficMonitor<C: Clock = SystemClock> {
    config: MonitorConfig,
    clock: C,
    core: Mutex<MonitorCore>,
}

impl TrafficMonitor<SystemClock> {
    /// Create a monitor driven by the system clock.
    ///
    /// The first periodic reset deadline is one period from now.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Validate `config`, then create a monitor driven by the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn try_new(config: MonitorConfig) -> MonitorResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl Default for TrafficMonitor<SystemClock> {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl<C: Clock> TrafficMonitor<C> {
    /// Create a monitor reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: MonitorConfig, clock: C) -> Self {
        let core = MonitorCore::new(&config, clock.now());
        Self {
            config,
            clock,
            core: Mutex::new(core),
        }
    }

    /// Configuration the monitor was created with.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Move from `Init` to `Active` and reschedule the periodic reset.
    ///
    /// Returns `false`, changing nothing, in any other state.
    pub fn start(&self) -> bool {
        let mut core = self.core.lock();
        let now = self.clock.now();
        let started = core.machine.start(now);
        if started {
            tracing::info!("Traffic monitor started");
        } else {
            tracing::debug!(state = %core.machine.state(), "Start ignored");
        }
        started
    }

    /// Move from `Active` to `Stopped`.
    ///
    /// Returns `false`, changing nothing, in any other state. Periodic reset
    /// is suppressed while stopped.
    pub fn stop(&self) -> bool {
        let mut core = self.core.lock();
        let stopped = core.machine.stop();
        if stopped {
            tracing::info!("Traffic monitor stopped");
        } else {
            tracing::debug!(state = %core.machine.state(), "Stop ignored");
        }
        stopped
    }

    /// Release every record, clear the fault counter and become `Active`.
    ///
    /// Valid from any state, including `Stopped`.
    pub fn reset(&self) {
        let mut core = self.core.lock();
        let now = self.clock.now();
        core.reset(now, ResetTrigger::Manual);
    }

    /// Deliver one signal.
    pub fn on_signal(&self, signal: Signal) {
        match signal {
            Signal::Vehicle { category, id } => self.signal_vehicle(category, &id),
            Signal::Fault => self.signal_fault(),
            Signal::Reset => self.reset(),
        }
    }

    /// Deliver a vehicle observation.
    ///
    /// A due periodic reset is applied first. Then, depending on state, the
    /// signal is ignored (`Init`, `Stopped`), counted as a fault (`Error`), or
    /// counted against the `(category, id)` record (`Active`). When no slot is
    /// free for a new record the fault counter is incremented instead and
    /// the state stays `Active`.
    pub fn signal_vehicle(&self, category: VehicleCategory, id: &str) {
        let mut core = self.core.lock();
        let now = self.clock.now();
        core.apply_periodic_reset(now);

        let disposition = core.vehicle(category, id);
        core.log_vehicle(disposition, category, id);
    }

    /// Deliver a camera fault.
    ///
    /// A due periodic reset is applied first. `Active` moves to `Error`;
    /// `Active` and `Error` increment the fault counter; `Init` and `Stopped`
    /// ignore the signal.
    pub fn signal_fault(&self) {
        let mut core = self.core.lock();
        let now = self.clock.now();
        core.apply_periodic_reset(now);

        let disposition = core.fault();
        core.log_fault(disposition);
    }

    /// Apply the periodic reset if its deadline has passed.
    ///
    /// Returns `true` if a reset fired. Never fires while `Stopped`.
    pub fn check_periodic_reset(&self) -> bool {
        let mut core = self.core.lock();
        let now = self.clock.now();
        core.apply_periodic_reset(now)
    }

    /// Current state.
    #[must_use]
    pub fn current_state(&self) -> MonitorState {
        self.core.lock().machine.state()
    }

    /// Faults in the current reset epoch.
    #[must_use]
    pub fn fault_count(&self) -> u32 {
        self.core.lock().machine.fault_count()
    }

    /// Statistics lines of one category in first-observed order.
    #[must_use]
    pub fn statistics(&self, category: VehicleCategory) -> Vec<String> {
        let core = self.core.lock();
        core.index.snapshot_category(&core.pool, category)
    }

    /// Statistics lines of all records, ascending by identifier.
    ///
    /// Records with equal identifiers keep their first-observed order.
    #[must_use]
    pub fn statistics_all(&self) -> Vec<String> {
        let core = self.core.lock();
        core.index.snapshot_all(&core.pool)
    }

    /// Number of records currently held.
    #[must_use]
    pub fn live_records(&self) -> usize {
        self.core.lock().index.len()
    }

    /// Maximum number of records.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.core.lock().pool.capacity()
    }

    /// Instant at which the next periodic reset becomes due.
    #[must_use]
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.core.lock().machine.next_reset()
    }

    /// Consistent view of state, fault count and global statistics.
    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.core.lock().snapshot()
    }
}

impl<C: Clock> std::fmt::Debug for TrafficMonitor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrafficMonitor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;

    fn manual_monitor(period_ms: u64) -> (TrafficMonitor<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = MonitorConfig::builder().reset_period_ms(period_ms).build().unwrap();
        (TrafficMonitor::with_clock(config, clock.clone()), clock)
    }

    #[test]
    fn test_new_monitor_is_idle() {
        let monitor = TrafficMonitor::default();
        assert_eq!(monitor.current_state(), MonitorState::Init);
        assert_eq!(monitor.fault_count(), 0);
        assert!(monitor.statistics_all().is_empty());
        assert_eq!(monitor.capacity(), MAX_VEHICLES);
    }

    #[test]
    fn test_signals_ignored_before_start() {
        let (monitor, _clock) = manual_monitor(1000);
        monitor.signal_vehicle(VehicleCategory::Car, "C1");
        monitor.signal_fault();

        assert_eq!(monitor.current_state(), MonitorState::Init);
        assert_eq!(monitor.fault_count(), 0);
        assert_eq!(monitor.live_records(), 0);
    }

    #[test]
    fn test_repeat_vehicle_increments_count() {
        let (monitor, _clock) = manual_monitor(1000);
        monitor.start();
        monitor.signal_vehicle(VehicleCategory::Scooter, "S1");
        monitor.signal_vehicle(VehicleCategory::Scooter, "S1");
        monitor.signal_vehicle(VehicleCategory::Scooter, "S1");

        assert_eq!(monitor.statistics(VehicleCategory::Scooter), vec!["S1 - Scooter (3)"]);
        assert_eq!(monitor.live_records(), 1);
    }

    #[test]
    fn test_on_signal_dispatch() {
        let (monitor, _clock) = manual_monitor(1000);
        monitor.start();

        monitor.on_signal(Signal::vehicle(VehicleCategory::Bicycle, "B1"));
        assert_eq!(monitor.live_records(), 1);

        monitor.on_signal(Signal::Fault);
        assert_eq!(monitor.current_state(), MonitorState::Error);

        monitor.on_signal(Signal::Reset);
        assert_eq!(monitor.current_state(), MonitorState::Active);
        assert_eq!(monitor.fault_count(), 0);
        assert_eq!(monitor.live_records(), 0);
    }

    #[test]
    fn test_start_and_stop_report_transitions() {
        let (monitor, _clock) = manual_monitor(1000);
        assert!(!monitor.stop());
        assert!(monitor.start());
        assert!(!monitor.start());
        assert!(monitor.stop());
        assert!(!monitor.stop());
        assert_eq!(monitor.current_state(), MonitorState::Stopped);
    }

    #[test]
    fn test_periodic_reset_is_lazy() {
        let (monitor, clock) = manual_monitor(1000);
        monitor.start();
        monitor.signal_vehicle(VehicleCategory::Car, "C1");
        monitor.signal_fault();

        clock.advance(Duration::from_millis(1200));
        // Nothing happens until the next signal or explicit check
        assert_eq!(monitor.current_state(), MonitorState::Error);
        assert_eq!(monitor.live_records(), 1);

        monitor.signal_vehicle(VehicleCategory::Car, "C2");
        assert_eq!(monitor.current_state(), MonitorState::Active);
        assert_eq!(monitor.fault_count(), 0);
        assert_eq!(monitor.statistics_all(), vec!["C2 - Car (1)"]);
    }

    #[test]
    fn test_check_periodic_reset_reports_firing() {
        let (monitor, clock) = manual_monitor(500);
        monitor.start();
        assert!(!monitor.check_periodic_reset());

        clock.advance(Duration::from_millis(500));
        assert!(monitor.check_periodic_reset());
        assert!(!monitor.check_periodic_reset());
    }

    #[test]
    fn test_reset_reschedules_deadline() {
        let (monitor, clock) = manual_monitor(1000);
        clock.advance(Duration::from_millis(300));
        monitor.reset();

        assert_eq!(
            monitor.reset_deadline(),
            Some(clock.now() + Duration::from_millis(1000))
        );
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let (monitor, _clock) = manual_monitor(1000);
        monitor.start();
        monitor.signal_vehicle(VehicleCategory::Car, "B");
        monitor.signal_vehicle(VehicleCategory::Bicycle, "A");

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.state, MonitorState::Active);
        assert_eq!(snapshot.fault_count, 0);
        assert_eq!(snapshot.capacity, MAX_VEHICLES);
        assert_eq!(snapshot.lines, vec!["A - Bicycle (1)", "B - Car (1)"]);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json.get("state").and_then(|v| v.as_str()), Some("Active"));
        assert_eq!(json.get("fault_count").and_then(serde_json::Value::as_u64), Some(0));
    }

    #[test]
    fn test_parse_vehicle() {
        assert_eq!(
            Signal::parse_vehicle("car", " C1 ").unwrap(),
            Signal::vehicle(VehicleCategory::Car, "C1")
        );
        assert_eq!(
            Signal::parse_vehicle("Truck", "T1"),
            Err(MonitorError::UnknownCategory("Truck".to_string()))
        );
        assert_eq!(
            Signal::parse_vehicle("Bicycle", "   "),
            Err(MonitorError::EmptyIdentifier)
        );
    }

    #[test]
    fn test_try_new_validates() {
        let config = MonitorConfig {
            reset_period_ms: u64::MAX,
        };
        assert!(TrafficMonitor::try_new(config).is_err());
        assert!(TrafficMonitor::try_new(MonitorConfig::default()).is_ok());
    }

    #[test]
    fn test_core_stays_consistent_through_exhaustion() {
        let (monitor, _clock) = manual_monitor(60_000);
        monitor.start();
        for i in 0..=MAX_VEHICLES {
            monitor.signal_vehicle(VehicleCategory::Bicycle, &format!("B{i:04}"));
        }

        let core = monitor.core.lock();
        assert!(core.index.is_consistent(&core.pool));
        assert!(core.pool.is_exhausted());
        assert_eq!(core.machine.fault_count(), 1);
    }
}
