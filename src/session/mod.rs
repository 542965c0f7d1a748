//! Cooking sessions — records, lifecycle and phase scheduling.
//!
//! ```text
//!   start ──▶ ACTIVE ◀──pause/resume──▶ PAUSED
//!               │                          │
//!               └──complete/cancel──┬──────┘
//!                                   ▼
//!                         COMPLETED / CANCELLED   (terminal, endTime set)
//! ```
//!
//! [`SessionManager`] owns the lifecycle rules and talks to a
//! [`SessionStore`](crate::app::ports::SessionStore) port; the records
//! themselves are plain serde structs so any store can persist them.

pub mod lifecycle;
pub mod manager;
pub mod phases;

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use lifecycle::SessionAction;
pub use manager::SessionManager;

/// Default page size for [`SessionManager::list`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Identity and enums
// ---------------------------------------------------------------------------

/// Store-assigned session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Completed and cancelled sessions never change status again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the end of a cook is decided.  Only `Timer` sessions follow the
/// recipe's phase schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingMode {
    Timer,
    Probe,
    Manual,
}

// ---------------------------------------------------------------------------
// Session record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSession {
    pub id: SessionId,
    pub recipe_id: Option<String>,
    pub recipe_name: String,
    /// Target chamber temperature in °C.
    pub target_temp: f32,
    pub target_humidity: Option<f32>,
    pub fan_speed: u8,
    pub mode: CookingMode,
    pub status: SessionStatus,
    /// 0-based; always `< total_phases` while the session is live.
    pub current_phase: u32,
    pub total_phases: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Last observed chamber temperature in °C.
    pub actual_temp: Option<f32>,
    pub humidity: Option<f32>,
    pub notes: Option<String>,
    pub owner: Option<String>,
    /// Set while the session is paused.
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    /// Seconds spent paused across all completed pause spans.
    #[serde(default)]
    pub paused_secs: u64,
}

impl CookingSession {
    /// Seconds the session has spent cooking, excluding pauses.
    ///
    /// The clock stops at `end_time` for finished sessions and at
    /// `paused_at` while paused.
    pub fn active_elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let until = self.end_time.or(self.paused_at).unwrap_or(now);
        let wall = (until - self.start_time).num_seconds().max(0) as u64;
        wall.saturating_sub(self.paused_secs)
    }

    /// Wall-clock cook time for a finished session.
    pub fn duration_secs(&self) -> Option<u64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds().max(0) as u64)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Parameters for [`SessionManager::start`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSession {
    pub recipe_id: Option<String>,
    pub recipe_name: String,
    pub target_temp: f32,
    pub target_humidity: Option<f32>,
    pub fan_speed: u8,
    pub mode: CookingMode,
    pub total_phases: u32,
    pub notes: Option<String>,
    pub owner: Option<String>,
}

/// Partial update for [`SessionManager::update`].  `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub actual_temp: Option<f32>,
    pub humidity: Option<f32>,
    pub current_phase: Option<u32>,
    pub notes: Option<String>,
    pub target_temp: Option<f32>,
}

/// Aggregate counters over every stored session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Sum of `end_time - start_time` over finished sessions.
    pub total_cook_secs: u64,
}
