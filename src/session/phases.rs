//! Recipe phases and the timer-mode phase schedule.
//!
//! A recipe is an ordered list of [`RecipePhase`]s.  A timer-mode session
//! counts down the recipe's total duration; the current phase is over once
//! the remaining time fits inside the phases that follow it:
//!
//! ```text
//!   phases      [ 10 min ][ 20 min ][ 15 min ]
//!   remaining   45 ─────▶ 35 ─────▶ 15 ─────▶ 0
//!                         ▲         ▲         ▲
//!                    advance    advance    complete
//! ```
//!
//! Everything here is pure: the caller supplies the clock reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CookingSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatingMode {
    Preheat,
    Conventional,
    Convection,
    Grill,
    Steam,
}

/// What ends a phase.  Only `Time` is evaluated by the scheduler; a
/// `Temperature` phase still occupies its slot in the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopCondition {
    Time,
    Temperature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePhase {
    pub name: String,
    pub description: String,
    /// Chamber target in °C while this phase runs.
    pub temperature: f32,
    pub duration_minutes: u32,
    pub heating_mode: HeatingMode,
    pub stop_condition: StopCondition,
    pub icon: String,
    pub order: u32,
}

impl RecipePhase {
    pub const fn duration_secs(&self) -> u64 {
        self.duration_minutes as u64 * 60
    }
}

/// Outcome of one [`decide`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDecision {
    pub advance: bool,
    /// Temperature of the phase being entered, when advancing.
    pub next_target_temp: Option<f32>,
}

impl PhaseDecision {
    const STAY: Self = Self {
        advance: false,
        next_target_temp: None,
    };
}

/// Index of the last phase the session can reach, bounded by both the
/// session's phase count and the recipe's actual list.
fn last_index(session: &CookingSession, phases: &[RecipePhase]) -> Option<usize> {
    let reachable = (session.total_phases as usize).min(phases.len());
    reachable.checked_sub(1)
}

/// Total countdown length of the recipe in seconds.
pub fn total_duration_secs(phases: &[RecipePhase]) -> u64 {
    phases.iter().map(RecipePhase::duration_secs).sum()
}

/// Seconds left on the recipe timer, never negative.
pub fn remaining_secs(session: &CookingSession, phases: &[RecipePhase], now: DateTime<Utc>) -> u64 {
    total_duration_secs(phases).saturating_sub(session.active_elapsed_secs(now))
}

/// Decide whether the session should move past its current phase.
///
/// Advances when `remaining_secs` is at most the summed duration of every
/// phase after the current one and the current phase is not the last.
pub fn decide(session: &CookingSession, phases: &[RecipePhase], remaining_secs: u64) -> PhaseDecision {
    let Some(last) = last_index(session, phases) else {
        return PhaseDecision::STAY;
    };
    let current = session.current_phase as usize;
    if current >= last {
        return PhaseDecision::STAY;
    }

    let after_current: u64 = phases[current + 1..]
        .iter()
        .map(RecipePhase::duration_secs)
        .sum();
    if remaining_secs > after_current {
        return PhaseDecision::STAY;
    }

    PhaseDecision {
        advance: true,
        next_target_temp: Some(phases[current + 1].temperature),
    }
}
