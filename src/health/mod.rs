//! Device health monitoring.
//!
//! ```text
//!  StatusProbe ──insert──▶ ┌───────────────────┐ ◀──delete── StatusJanitor
//!                          │ DeviceStatusStore │
//!                          └─────────┬─────────┘
//!                                    │ recent(N)
//!                                    ▼
//!                          HealthAggregator ──▶ HealthVerdict
//! ```
//!
//! Observations are append-only.  A verdict only ever looks at the newest
//! observation per device id inside a bounded window, so a device that
//! stops reporting drops out of the verdict once the janitor prunes it.

pub mod aggregator;
pub mod janitor;
pub mod probe;

use core::fmt;

use chrono::{DateTime, Utc};
use heapless::FnvIndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

pub use aggregator::HealthAggregator;
pub use janitor::StatusJanitor;
pub use probe::StatusProbe;

/// Distinct devices a single verdict can track.  Must be a power of two.
pub const MAX_TRACKED_DEVICES: usize = 128;

// ---------------------------------------------------------------------------
// Device taxonomy
// ---------------------------------------------------------------------------

/// Kind of device behind an observation.  Unknown kinds are kept verbatim
/// so newer producers do not break older readers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    TemperatureSensor,
    HumiditySensor,
    Fan,
    HeatingElement,
    Probe,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::TemperatureSensor => "temperature_sensor",
            Self::HumiditySensor => "humidity_sensor",
            Self::Fan => "fan",
            Self::HeatingElement => "heating_element",
            Self::Probe => "probe",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for DeviceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "temperature_sensor" => Self::TemperatureSensor,
            "humidity_sensor" => Self::HumiditySensor,
            "fan" => Self::Fan,
            "heating_element" => Self::HeatingElement,
            "probe" => Self::Probe,
            _ => Self::Other(s),
        }
    }
}

impl From<DeviceType> for String {
    fn from(t: DeviceType) -> Self {
        match t {
            DeviceType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Healthy,
    Warning,
    Error,
}

impl fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One status report from one device at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceObservation {
    pub device_type: DeviceType,
    pub device_id: String,
    pub status: DeviceStatus,
    pub last_reading: Option<f64>,
    #[serde(rename = "lastUpdate")]
    pub timestamp: DateTime<Utc>,
    /// Free-form producer data; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthVerdict {
    pub overall_health: OverallHealth,
    pub total_devices: usize,
    pub online: usize,
    pub offline: usize,
    pub errors: usize,
    /// Latest observation per device.
    pub devices: Vec<DeviceObservation>,
    /// Newest observation timestamp; `None` with no devices.
    pub last_update: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

/// Keep only the newest observation per device id.
///
/// A later entry replaces an earlier one only if its timestamp is strictly
/// greater, so on ties the first one visited wins.  Output keeps the order
/// in which device ids were first seen.
pub fn reduce_latest(observations: &[DeviceObservation]) -> Vec<DeviceObservation> {
    let mut slots: FnvIndexMap<&str, usize, MAX_TRACKED_DEVICES> = FnvIndexMap::new();
    let mut latest: Vec<&DeviceObservation> = Vec::new();

    for obs in observations {
        if let Some(&i) = slots.get(obs.device_id.as_str()) {
            if obs.timestamp > latest[i].timestamp {
                latest[i] = obs;
            }
            continue;
        }
        if slots.insert(obs.device_id.as_str(), latest.len()).is_err() {
            warn!(
                "Health: more than {} devices, ignoring {}",
                MAX_TRACKED_DEVICES, obs.device_id
            );
            continue;
        }
        latest.push(obs);
    }

    latest.into_iter().cloned().collect()
}

/// Count statuses over already-reduced devices.
pub fn verdict(devices: Vec<DeviceObservation>) -> HealthVerdict {
    let count = |s: DeviceStatus| devices.iter().filter(|d| d.status == s).count();
    let online = count(DeviceStatus::Online);
    let offline = count(DeviceStatus::Offline);
    let errors = count(DeviceStatus::Error);

    let overall_health = if errors > 0 {
        OverallHealth::Error
    } else if offline > 0 {
        OverallHealth::Warning
    } else {
        OverallHealth::Healthy
    };

    HealthVerdict {
        overall_health,
        total_devices: devices.len(),
        online,
        offline,
        errors,
        last_update: devices.iter().map(|d| d.timestamp).max(),
        devices,
    }
}
