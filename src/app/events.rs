//! Outbound application events.
//!
//! The periodic tasks emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, forward them to the
//! dashboard backend, etc.

use crate::control::HeaterMode;
use crate::error::{ActuatorError, SensorError};
use crate::health::HealthVerdict;
use crate::session::SessionId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A heater command reached the actuator.
    HeaterCommanded {
        session: Option<SessionId>,
        mode: HeaterMode,
    },

    /// The actuator rejected a command; the next tick retries.
    ActuatorFailed {
        mode: HeaterMode,
        error: ActuatorError,
    },

    /// The chamber temperature could not be read; the tick was skipped.
    SensorUnavailable(SensorError),

    /// A timer-mode session moved to a new phase.
    PhaseAdvanced {
        session: SessionId,
        phase: u32,
        target_temp: f32,
    },

    /// A timer-mode session ran out of time and was completed.
    SessionCompleted(SessionId),

    /// Fresh health verdict.
    Health(HealthVerdict),

    /// The janitor removed stale observations.
    StatusPruned { deleted: usize },
}
