//! Integration tests for the probe → ledger → verdict → retention loop.

use std::sync::Arc;

use chrono::Duration;

use ovenctl::adapters::memory::InMemoryStatusStore;
use ovenctl::adapters::time::ManualClock;
use ovenctl::app::events::AppEvent;
use ovenctl::app::ports::{Clock, DeviceStatusStore};
use ovenctl::config::SystemConfig;
use ovenctl::error::{ActuatorError, SensorError};
use ovenctl::health::{
    DeviceStatus, DeviceType, HealthAggregator, OverallHealth, StatusJanitor, StatusProbe,
};

use crate::mock_hw::{MockHeater, MockThermometer, RecordingSink};

struct Ledger {
    clock: Arc<ManualClock>,
    store: Arc<InMemoryStatusStore>,
    probe: StatusProbe<Arc<InMemoryStatusStore>, Arc<ManualClock>>,
    aggregator: HealthAggregator<Arc<InMemoryStatusStore>>,
    janitor: StatusJanitor<Arc<InMemoryStatusStore>, Arc<ManualClock>>,
}

impl Ledger {
    fn new() -> Self {
        let config = SystemConfig::default();
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(InMemoryStatusStore::new());
        Self {
            probe: StatusProbe::new(store.clone(), clock.clone(), &config),
            aggregator: HealthAggregator::new(store.clone(), config.health_window),
            janitor: StatusJanitor::new(
                store.clone(),
                clock.clone(),
                Duration::seconds(i64::from(config.status_retention_secs)),
            ),
            clock,
            store,
        }
    }
}

#[test]
fn healthy_hardware_yields_healthy_verdict() {
    let mut l = Ledger::new();
    let mut thermo = MockThermometer::new(l.clock.clone(), 180.0);
    let heater = MockHeater::new();
    let mut sink = RecordingSink::new();

    l.probe.tick(&mut thermo, &heater).unwrap();
    let v = l.aggregator.tick(&mut sink).unwrap().clone();

    assert_eq!(v.overall_health, OverallHealth::Healthy);
    assert_eq!((v.total_devices, v.online, v.errors), (2, 2, 0));
    assert_eq!(v.last_update, Some(l.clock.now()));
    assert_eq!(sink.events, vec![AppEvent::Health(v)]);
}

#[test]
fn sensor_fault_turns_verdict_error_then_recovers() {
    let mut l = Ledger::new();
    let mut thermo = MockThermometer::new(l.clock.clone(), 180.0);
    thermo.push(Err(SensorError::ReadFailed));
    let heater = MockHeater::new();
    let mut sink = RecordingSink::new();

    l.probe.tick(&mut thermo, &heater).unwrap();
    let v = l.aggregator.tick(&mut sink).unwrap();
    assert_eq!(v.overall_health, OverallHealth::Error);
    let sensor = v
        .devices
        .iter()
        .find(|d| d.device_type == DeviceType::TemperatureSensor)
        .unwrap();
    assert_eq!(sensor.status, DeviceStatus::Error);
    assert_eq!(sensor.last_reading, None);

    // A newer healthy row supersedes the fault.
    l.clock.advance(Duration::seconds(10));
    l.probe.tick(&mut thermo, &heater).unwrap();
    assert_eq!(
        l.aggregator.tick(&mut sink).unwrap().overall_health,
        OverallHealth::Healthy
    );
    assert_eq!(l.store.len(), 4);
}

#[test]
fn unreachable_heater_is_reported_as_error() {
    let l = Ledger::new();
    let mut thermo = MockThermometer::new(l.clock.clone(), 21.0);
    let mut heater = MockHeater::new();
    heater.fail = Some(ActuatorError::Unreachable);

    l.probe.tick(&mut thermo, &heater).unwrap();
    let elements = l
        .aggregator
        .current_status(Some(&DeviceType::HeatingElement))
        .unwrap();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].status, DeviceStatus::Error);
    assert_eq!(
        l.aggregator.evaluate().unwrap().overall_health,
        OverallHealth::Error
    );
}

#[test]
fn janitor_prunes_rows_past_retention() {
    let l = Ledger::new();
    let mut thermo = MockThermometer::new(l.clock.clone(), 150.0);
    let heater = MockHeater::new();
    let mut sink = RecordingSink::new();

    l.probe.tick(&mut thermo, &heater).unwrap();
    l.clock.advance(Duration::minutes(6));
    l.probe.tick(&mut thermo, &heater).unwrap();

    // First batch is 6 minutes old: inside the 10 minute window.
    assert_eq!(l.janitor.tick(&mut sink).unwrap(), 0);
    assert!(sink.events.is_empty());

    l.clock.advance(Duration::minutes(5));
    assert_eq!(l.janitor.tick(&mut sink).unwrap(), 2);
    assert_eq!(sink.events, vec![AppEvent::StatusPruned { deleted: 2 }]);
    assert_eq!(l.store.recent(10).unwrap().len(), 2);
}

#[test]
fn verdict_window_ignores_older_rows() {
    let config = SystemConfig::default();
    let clock = Arc::new(ManualClock::default());
    let store = Arc::new(InMemoryStatusStore::new());
    let probe = StatusProbe::new(store.clone(), clock.clone(), &config);
    let aggregator = HealthAggregator::new(store.clone(), 2);

    let mut thermo = MockThermometer::new(clock.clone(), 180.0);
    thermo.push(Err(SensorError::Timeout));
    let heater = MockHeater::new();

    probe.tick(&mut thermo, &heater).unwrap();
    clock.advance(Duration::seconds(10));
    probe.tick(&mut thermo, &heater).unwrap();

    // Only the latest two rows fit the window, and both are healthy.
    assert_eq!(
        aggregator.evaluate().unwrap().overall_health,
        OverallHealth::Healthy
    );
}
