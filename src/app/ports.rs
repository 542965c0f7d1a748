//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HeaterController / HealthAggregator / SessionManager
//! ```
//!
//! Driven adapters (sensor, heater relays, stores, event sinks, config file)
//! implement these traits.  The domain types consume them via generics, so
//! the control loop never touches hardware or a database directly.
//!
//! Hardware ports take `&mut self` and live on the task thread.  Store and
//! clock ports take `&self` and are `Send + Sync`: other actors (API
//! handlers, the dashboard backend) write to the same stores concurrently.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::SystemConfig;
use crate::control::HeaterMode;
use crate::error::{ActuatorError, SensorError, StoreError};
use crate::health::{DeviceObservation, DeviceType};
use crate::session::phases::RecipePhase;
use crate::session::{CookingSession, SessionId, SessionStatus};

// ───────────────────────────────────────────────────────────────
// Temperature source (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One chamber temperature sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub celsius: f32,
    pub at: DateTime<Utc>,
}

/// Read-side port for the chamber thermometer.
pub trait TemperatureSource {
    fn read(&mut self) -> Result<TemperatureReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator sink (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the heating element bank.
pub trait ActuatorSink {
    /// Drive the elements.  Repeating the current mode must be harmless.
    fn set_heater(&mut self, mode: HeaterMode) -> Result<(), ActuatorError>;

    /// Query the mode the elements are actually in.
    fn heater_state(&self) -> Result<HeaterMode, ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Session store
// ───────────────────────────────────────────────────────────────

/// Persistence for [`CookingSession`] records.
///
/// The store is a dumb record keeper: lifecycle rules live in
/// [`SessionManager`](crate::session::SessionManager).
pub trait SessionStore: Send + Sync {
    /// Persist a new session and return its assigned id.  The `id` field of
    /// `session` is ignored.
    fn insert(&self, session: CookingSession) -> Result<SessionId, StoreError>;

    fn get(&self, id: SessionId) -> Result<Option<CookingSession>, StoreError>;

    /// Edit one record atomically.  `edit` runs against a copy while the
    /// store holds the record exclusively; the copy is written back only if
    /// `edit` returns `Ok`.  An unknown id is
    /// [`Error::NotFound`](crate::Error::NotFound).
    ///
    /// Concurrent status changes cannot be lost: whatever another actor
    /// committed before the lock was taken is what `edit` sees.
    fn modify<T>(
        &self,
        id: SessionId,
        edit: impl FnOnce(&mut CookingSession) -> crate::Result<T>,
    ) -> crate::Result<T>;

    /// Every session, optionally restricted to one status, in no
    /// particular order.
    fn list(&self, status: Option<SessionStatus>) -> Result<Vec<CookingSession>, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Device status store
// ───────────────────────────────────────────────────────────────

/// Append-only ledger of device observations.
pub trait DeviceStatusStore: Send + Sync {
    fn insert(&self, observation: DeviceObservation) -> Result<(), StoreError>;

    /// Up to `limit` observations, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<DeviceObservation>, StoreError>;

    /// Up to `limit` observations of one device type, newest first.
    fn recent_by_type(
        &self,
        device_type: &DeviceType,
        limit: usize,
    ) -> Result<Vec<DeviceObservation>, StoreError>;

    /// Delete every observation strictly older than `cutoff`.  Returns the
    /// number of rows removed.
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Recipe book
// ───────────────────────────────────────────────────────────────

/// Read-only access to recipe phase lists.
pub trait RecipeBook: Send + Sync {
    /// The ordered phases of `recipe_id`, or `None` if the recipe is unknown.
    fn phases(&self, recipe_id: &str) -> Result<Option<Vec<RecipePhase>>, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Wall-clock source.  Injected so tests can move time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], never silently clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`ConfigError::NotFound`] if nothing has
    /// been stored yet.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Shared handles
// ───────────────────────────────────────────────────────────────

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn insert(&self, session: CookingSession) -> Result<SessionId, StoreError> {
        (**self).insert(session)
    }

    fn get(&self, id: SessionId) -> Result<Option<CookingSession>, StoreError> {
        (**self).get(id)
    }

    fn modify<U>(
        &self,
        id: SessionId,
        edit: impl FnOnce(&mut CookingSession) -> crate::Result<U>,
    ) -> crate::Result<U> {
        (**self).modify(id, edit)
    }

    fn list(&self, status: Option<SessionStatus>) -> Result<Vec<CookingSession>, StoreError> {
        (**self).list(status)
    }
}

impl<T: DeviceStatusStore + ?Sized> DeviceStatusStore for Arc<T> {
    fn insert(&self, observation: DeviceObservation) -> Result<(), StoreError> {
        (**self).insert(observation)
    }

    fn recent(&self, limit: usize) -> Result<Vec<DeviceObservation>, StoreError> {
        (**self).recent(limit)
    }

    fn recent_by_type(
        &self,
        device_type: &DeviceType,
        limit: usize,
    ) -> Result<Vec<DeviceObservation>, StoreError> {
        (**self).recent_by_type(device_type, limit)
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        (**self).delete_older_than(cutoff)
    }
}

impl<T: RecipeBook + ?Sized> RecipeBook for Arc<T> {
    fn phases(&self, recipe_id: &str) -> Result<Option<Vec<RecipePhase>>, StoreError> {
        (**self).phases(recipe_id)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config stored yet (first start).
    NotFound,
    /// Stored config could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
