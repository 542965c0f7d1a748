//! Device status producer.
//!
//! Samples the thermometer and the heater bank and appends one observation
//! for each.  A failed read becomes an `error` row rather than a missing
//! one, so the health verdict sees the fault.

use log::debug;
use serde_json::json;

use crate::app::ports::{ActuatorSink, Clock, DeviceStatusStore, TemperatureSource};
use crate::config::SystemConfig;
use crate::error::Result;

use super::{DeviceObservation, DeviceStatus, DeviceType};

pub struct StatusProbe<D, C> {
    store: D,
    clock: C,
    temperature_device_id: String,
    heater_device_id: String,
}

impl<D: DeviceStatusStore, C: Clock> StatusProbe<D, C> {
    pub fn new(store: D, clock: C, config: &SystemConfig) -> Self {
        Self {
            store,
            clock,
            temperature_device_id: config.temperature_device_id.clone(),
            heater_device_id: config.heater_device_id.clone(),
        }
    }

    pub fn tick(
        &self,
        sensor: &mut impl TemperatureSource,
        heater: &impl ActuatorSink,
    ) -> Result<()> {
        let now = self.clock.now();

        let thermometer = match sensor.read() {
            Ok(r) => DeviceObservation {
                device_type: DeviceType::TemperatureSensor,
                device_id: self.temperature_device_id.clone(),
                status: DeviceStatus::Online,
                last_reading: Some(f64::from(r.celsius)),
                timestamp: now,
                metadata: Some(json!({ "unit": "celsius" })),
            },
            Err(e) => DeviceObservation {
                device_type: DeviceType::TemperatureSensor,
                device_id: self.temperature_device_id.clone(),
                status: DeviceStatus::Error,
                last_reading: None,
                timestamp: now,
                metadata: Some(json!({ "error": e.to_string() })),
            },
        };

        // An idle heater is healthy: it reports online with reading 0.
        let element = match heater.heater_state() {
            Ok(mode) => DeviceObservation {
                device_type: DeviceType::HeatingElement,
                device_id: self.heater_device_id.clone(),
                status: DeviceStatus::Online,
                last_reading: Some(if mode.is_on() { 1.0 } else { 0.0 }),
                timestamp: now,
                metadata: Some(json!({ "mode": mode })),
            },
            Err(e) => DeviceObservation {
                device_type: DeviceType::HeatingElement,
                device_id: self.heater_device_id.clone(),
                status: DeviceStatus::Error,
                last_reading: None,
                timestamp: now,
                metadata: Some(json!({ "error": e.to_string() })),
            },
        };

        debug!(
            "Probe: {}={:?} {}={:?}",
            thermometer.device_id, thermometer.status, element.device_id, element.status
        );
        self.store.insert(thermometer)?;
        self.store.insert(element)?;
        Ok(())
    }
}
