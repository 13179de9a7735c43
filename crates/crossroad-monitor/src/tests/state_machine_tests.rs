//! State machine tests for the traffic monitor facade.

use crate::*;
use std::time::Duration;

fn monitor_with_period(period_ms: u64) -> (TrafficMonitor<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let config = MonitorConfig {
        reset_period_ms: period_ms,
    };
    (TrafficMonitor::with_clock(config, clock.clone()), clock)
}

fn drive_to(monitor: &TrafficMonitor<ManualClock>, state: MonitorState) {
    match state {
        MonitorState::Init => {}
        MonitorState::Active => {
            monitor.start();
        }
        MonitorState::Error => {
            monitor.start();
            monitor.signal_fault();
        }
        MonitorState::Stopped => {
            monitor.start();
            monitor.stop();
        }
    }
    assert_eq!(monitor.current_state(), state);
}

const ALL_STATES: [MonitorState; 4] = [
    MonitorState::Init,
    MonitorState::Active,
    MonitorState::Error,
    MonitorState::Stopped,
];

#[test]
fn test_error_is_left_only_by_reset() {
    let (monitor, _clock) = monitor_with_period(60_000);
    drive_to(&monitor, MonitorState::Error);

    assert!(!monitor.start());
    assert!(!monitor.stop());
    monitor.signal_vehicle(VehicleCategory::Car, "C1");
    monitor.signal_fault();
    assert_eq!(monitor.current_state(), MonitorState::Error);
    assert_eq!(monitor.fault_count(), 3);

    monitor.reset();
    assert_eq!(monitor.current_state(), MonitorState::Active);
    assert_eq!(monitor.fault_count(), 0);
}

#[test]
fn test_stopped_ignores_everything_but_reset() {
    let (monitor, clock) = monitor_with_period(1000);
    drive_to(&monitor, MonitorState::Stopped);

    monitor.signal_vehicle(VehicleCategory::Scooter, "S1");
    monitor.signal_fault();
    assert!(!monitor.start());

    clock.advance(Duration::from_millis(5000));
    assert!(!monitor.check_periodic_reset());
    monitor.signal_fault();

    assert_eq!(monitor.current_state(), MonitorState::Stopped);
    assert_eq!(monitor.fault_count(), 0);
    assert!(monitor.statistics_all().is_empty());

    monitor.reset();
    assert_eq!(monitor.current_state(), MonitorState::Active);
}

#[test]
fn test_reset_from_every_state_clears_data() {
    for state in ALL_STATES {
        let (monitor, _clock) = monitor_with_period(60_000);
        if state != MonitorState::Init {
            monitor.start();
            monitor.signal_vehicle(VehicleCategory::Bicycle, "B1");
            monitor.reset();
        }
        drive_to(&monitor, state);
        monitor.signal_vehicle(VehicleCategory::Car, "C1");

        monitor.reset();
        assert_eq!(monitor.current_state(), MonitorState::Active);
        assert_eq!(monitor.fault_count(), 0);
        assert!(monitor.statistics_all().is_empty());
        for category in VehicleCategory::all() {
            assert!(monitor.statistics(category).is_empty());
        }
    }
}

#[test]
fn test_periodic_reset_fires_from_init() {
    let (monitor, clock) = monitor_with_period(1000);
    clock.advance(Duration::from_millis(1000));

    // Reset forces Active even though Start was never called
    monitor.signal_vehicle(VehicleCategory::Car, "C1");
    assert_eq!(monitor.current_state(), MonitorState::Active);
    assert_eq!(monitor.statistics_all(), vec!["C1 - Car (1)"]);
}

#[test]
fn test_periodic_reset_precedes_fault_signal() {
    let (monitor, clock) = monitor_with_period(1000);
    drive_to(&monitor, MonitorState::Error);
    clock.advance(Duration::from_millis(1001));

    monitor.signal_fault();
    assert_eq!(monitor.current_state(), MonitorState::Error);
    assert_eq!(monitor.fault_count(), 1);
}

#[test]
fn test_start_reschedules_periodic_reset() {
    let (monitor, clock) = monitor_with_period(1000);
    clock.advance(Duration::from_millis(900));
    monitor.start();
    monitor.signal_vehicle(VehicleCategory::Car, "C1");

    clock.advance(Duration::from_millis(900));
    assert!(!monitor.check_periodic_reset());
    assert_eq!(monitor.live_records(), 1);

    clock.advance(Duration::from_millis(100));
    assert!(monitor.check_periodic_reset());
    assert_eq!(monitor.live_records(), 0);
}

#[test]
fn test_zero_period_resets_on_every_signal() {
    let (monitor, _clock) = monitor_with_period(0);
    monitor.start();

    monitor.signal_vehicle(VehicleCategory::Car, "C1");
    monitor.signal_vehicle(VehicleCategory::Car, "C1");
    assert_eq!(monitor.statistics_all(), vec!["C1 - Car (1)"]);

    monitor.signal_fault();
    monitor.signal_fault();
    assert_eq!(monitor.fault_count(), 1);
}
