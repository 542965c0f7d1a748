//! Unified error types for the oven control core.
//!
//! A single `Error` enum that every subsystem converts into, so the periodic
//! tasks and the session API share one error vocabulary.  Hardware and store
//! errors are small `Copy` enums; only the session-level variants carry data.

use core::fmt;

use crate::session::{SessionAction, SessionId, SessionStatus};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The temperature source could not produce a reading.
    SensorUnavailable(SensorError),
    /// The heater rejected or never acknowledged a command.
    ActuatorCommandFailed(ActuatorError),
    /// A lifecycle operation is not legal from the session's current status.
    InvalidTransition {
        session: SessionId,
        from: SessionStatus,
        action: SessionAction,
    },
    /// No session with this id exists.
    NotFound(SessionId),
    /// The session is completed or cancelled; its live fields are frozen.
    SessionEnded(SessionId),
    /// The owner already has an active session.
    ConcurrentActiveSession {
        owner: Option<String>,
        existing: SessionId,
    },
    /// Session input was rejected before touching the store.
    InvalidSession(&'static str),
    /// The backing store failed.
    Store(StoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorUnavailable(e) => write!(f, "sensor unavailable: {e}"),
            Self::ActuatorCommandFailed(e) => write!(f, "actuator command failed: {e}"),
            Self::InvalidTransition {
                session,
                from,
                action,
            } => write!(f, "session {session}: cannot {action} while {from}"),
            Self::NotFound(id) => write!(f, "session {id} not found"),
            Self::SessionEnded(id) => write!(f, "session {id} has ended"),
            Self::ConcurrentActiveSession { owner, existing } => match owner {
                Some(o) => write!(f, "owner {o} already has active session {existing}"),
                None => write!(f, "session {existing} is already active"),
            },
            Self::InvalidSession(msg) => write!(f, "invalid session: {msg}"),
            Self::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer in time.
    Timeout,
    /// The read returned an error.
    ReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "read timed out"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::SensorUnavailable(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed on one of the relay channels.
    GpioWriteFailed,
    /// The heater controller did not respond.
    Unreachable,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::Unreachable => write!(f, "heater unreachable"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::ActuatorCommandFailed(e)
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached.
    Unavailable,
    /// A writer panicked while holding the store lock.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "backend unavailable"),
            Self::Poisoned => write!(f, "lock poisoned"),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
