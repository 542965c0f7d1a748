//! System configuration parameters
//!
//! All tunable parameters for the oven control core.
//! Values can be overridden from a JSON file through [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::HeaterMode;
use crate::health::MAX_TRACKED_DEVICES;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Heater control ---
    /// Heater decision interval (milliseconds)
    pub heater_interval_ms: u32,
    /// Element combination used when heat is called for
    pub heater_on_mode: HeaterMode,
    /// Re-send the cached heater command every N ticks (1 = every tick)
    pub command_reassert_ticks: u32,
    /// Only sessions of this owner drive the heater; `None` = any owner
    pub session_owner: Option<String>,

    // --- Health ---
    /// Device probe interval (milliseconds)
    pub probe_interval_ms: u32,
    /// Health verdict interval (milliseconds)
    pub health_interval_ms: u32,
    /// Observations considered per verdict
    pub health_window: usize,
    /// Device id recorded for the chamber thermometer
    pub temperature_device_id: String,
    /// Device id recorded for the heating element bank
    pub heater_device_id: String,

    // --- Retention ---
    /// Janitor interval (milliseconds)
    pub janitor_interval_ms: u32,
    /// Observations older than this are deleted (seconds)
    pub status_retention_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Heater control
            heater_interval_ms: 5_000, // 0.2 Hz
            heater_on_mode: HeaterMode::Both,
            command_reassert_ticks: 12, // once a minute at 5 s
            session_owner: None,

            // Health
            probe_interval_ms: 10_000,
            health_interval_ms: 10_000,
            health_window: 100,
            temperature_device_id: "main_temp_sensor".into(),
            heater_device_id: "main_heater".into(),

            // Retention
            janitor_interval_ms: 30_000,
            status_retention_secs: 600, // 10 min
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects, never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(500..=60_000).contains(&self.heater_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "heater_interval_ms must be 500–60000",
            ));
        }
        if self.heater_on_mode == HeaterMode::Off {
            return Err(ConfigError::ValidationFailed(
                "heater_on_mode must energise at least one element",
            ));
        }
        if !(1..=1000).contains(&self.command_reassert_ticks) {
            return Err(ConfigError::ValidationFailed(
                "command_reassert_ticks must be 1–1000",
            ));
        }
        if !(1_000..=600_000).contains(&self.probe_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "probe_interval_ms must be 1000–600000",
            ));
        }
        if !(1_000..=600_000).contains(&self.health_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "health_interval_ms must be 1000–600000",
            ));
        }
        if !(1..=MAX_TRACKED_DEVICES).contains(&self.health_window) {
            return Err(ConfigError::ValidationFailed(
                "health_window must be 1–128",
            ));
        }
        if self.temperature_device_id.is_empty() || self.heater_device_id.is_empty() {
            return Err(ConfigError::ValidationFailed("device ids must not be empty"));
        }
        if self.temperature_device_id == self.heater_device_id {
            return Err(ConfigError::ValidationFailed(
                "temperature_device_id and heater_device_id must differ",
            ));
        }
        if !(1_000..=3_600_000).contains(&self.janitor_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "janitor_interval_ms must be 1000–3600000",
            ));
        }
        if !(60..=7 * 24 * 3600).contains(&self.status_retention_secs) {
            return Err(ConfigError::ValidationFailed(
                "status_retention_secs must be 60–604800",
            ));
        }
        if u64::from(self.status_retention_secs) * 1000 < u64::from(self.probe_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "status_retention_secs must cover at least one probe interval",
            ));
        }
        Ok(())
    }
}
