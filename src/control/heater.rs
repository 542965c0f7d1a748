//! Bang-bang heater controller.
//!
//! ```text
//!  SessionStore ──▶ ┌──────────────────────────────┐ ──▶ ActuatorSink
//!                   │      HeaterController         │
//!  TemperatureSource│ resolve · read · phase · cmd  │ ──▶ EventSink
//!           ──────▶ └──────────────────────────────┘
//! ```
//!
//! One [`tick`](HeaterController::tick) per control period, strictly in
//! order:
//!
//! 1. resolve the active session (none → heater off, fail-safe)
//! 2. read the chamber temperature (failure → skip, actuator untouched)
//! 3. timer-mode sessions follow their recipe's phase schedule
//! 4. `on = temperature < target`, command the actuator
//!
//! The only state carried between ticks is the last command sent, used
//! to suppress redundant actuator writes.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    ActuatorSink, Clock, EventSink, RecipeBook, SessionStore, TemperatureSource,
};
use crate::config::SystemConfig;
use crate::error::{ActuatorError, Error, SensorError};
use crate::session::phases;
use crate::session::{CookingMode, CookingSession, SessionId, SessionManager, SessionPatch};

use super::HeaterMode;

/// What a single control tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No active session; the heater was driven off.
    NoSession,
    /// The session store could not be read; nothing was commanded.
    StoreSkipped,
    /// The temperature read failed; nothing was commanded.
    SensorSkipped(SensorError),
    /// The session's timer ran out; it was completed and the heater driven off.
    Completed(SessionId),
    /// Normal regulation step.
    Regulated {
        session: SessionId,
        temperature: f32,
        target: f32,
        heater: HeaterMode,
    },
    /// The actuator rejected the command.
    ActuatorFailed(ActuatorError),
}

enum RecipeStep {
    Hold(f32),
    Finished,
    /// Another actor ended the session after this tick resolved it.
    Ended,
}

pub struct HeaterController<S, C, R> {
    sessions: SessionManager<S, C>,
    recipes: R,
    on_mode: HeaterMode,
    owner: Option<String>,
    reassert_every: u32,
    last_command: Option<HeaterMode>,
    tick_count: u64,
}

impl<S: SessionStore, C: Clock, R: RecipeBook> HeaterController<S, C, R> {
    pub fn new(sessions: SessionManager<S, C>, recipes: R, config: &SystemConfig) -> Self {
        Self {
            sessions,
            recipes,
            on_mode: config.heater_on_mode,
            owner: config.session_owner.clone(),
            reassert_every: config.command_reassert_ticks.max(1),
            last_command: None,
            tick_count: 0,
        }
    }

    pub fn sessions(&self) -> &SessionManager<S, C> {
        &self.sessions
    }

    /// Last command the actuator acknowledged, if any.
    pub fn last_command(&self) -> Option<HeaterMode> {
        self.last_command
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Control tick ──────────────────────────────────────────

    pub fn tick(
        &mut self,
        sensor: &mut impl TemperatureSource,
        heater: &mut impl ActuatorSink,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count = self.tick_count.wrapping_add(1);

        let session = match self.sessions.get_active(self.owner.as_deref()) {
            Ok(Some(s)) => s,
            Ok(None) => {
                return match self.command(heater, HeaterMode::Off, None, sink) {
                    Ok(()) => TickOutcome::NoSession,
                    Err(e) => TickOutcome::ActuatorFailed(e),
                };
            }
            Err(e) => {
                warn!("Heater tick skipped: session lookup failed: {}", e);
                return TickOutcome::StoreSkipped;
            }
        };

        let reading = match sensor.read() {
            Ok(r) => r,
            Err(e) => {
                warn!("Heater tick skipped: temperature read failed: {}", e);
                sink.emit(&AppEvent::SensorUnavailable(e));
                return TickOutcome::SensorSkipped(e);
            }
        };

        let target = match self.follow_recipe(&session, sink) {
            RecipeStep::Hold(t) => t,
            RecipeStep::Finished => return self.finish(&session, heater, sink),
            RecipeStep::Ended => return self.ended(session.id, heater, sink),
        };

        let patch = SessionPatch {
            actual_temp: Some(reading.celsius),
            ..SessionPatch::default()
        };
        match self.sessions.update(session.id, patch) {
            Ok(()) => {}
            Err(Error::SessionEnded(_)) => return self.ended(session.id, heater, sink),
            Err(e) => warn!("Session {}: recording temperature failed: {}", session.id, e),
        }

        let mode = if reading.celsius < target {
            self.on_mode
        } else {
            HeaterMode::Off
        };
        debug!(
            "Heater: session {} T={:.1}\u{00b0}C target={:.1}\u{00b0}C -> {}",
            session.id, reading.celsius, target, mode
        );

        match self.command(heater, mode, Some(session.id), sink) {
            Ok(()) => TickOutcome::Regulated {
                session: session.id,
                temperature: reading.celsius,
                target,
                heater: mode,
            },
            Err(e) => TickOutcome::ActuatorFailed(e),
        }
    }

    // ── Recipe schedule ───────────────────────────────────────

    /// Apply the phase schedule for timer-mode sessions and return the
    /// target to regulate against.  At most one phase advance per tick.
    fn follow_recipe(&self, session: &CookingSession, sink: &mut impl EventSink) -> RecipeStep {
        let hold = RecipeStep::Hold(session.target_temp);
        if session.mode != CookingMode::Timer {
            return hold;
        }
        let Some(recipe_id) = session.recipe_id.as_deref() else {
            return hold;
        };

        let recipe = match self.recipes.phases(recipe_id) {
            Ok(Some(p)) if !p.is_empty() => p,
            Ok(_) => {
                debug!("Recipe {} has no phases, holding target", recipe_id);
                return hold;
            }
            Err(e) => {
                warn!("Recipe {} lookup failed: {}", recipe_id, e);
                return hold;
            }
        };

        let remaining = phases::remaining_secs(session, &recipe, self.sessions.clock().now());
        if remaining == 0 {
            return RecipeStep::Finished;
        }

        let decision = phases::decide(session, &recipe, remaining);
        let Some(next_target) = decision.next_target_temp.filter(|_| decision.advance) else {
            return hold;
        };

        let phase = match self.sessions.advance_phase(session.id) {
            Ok(p) => p,
            Err(Error::SessionEnded(_)) => return RecipeStep::Ended,
            Err(e) => {
                warn!("Session {}: phase advance failed: {}", session.id, e);
                return hold;
            }
        };
        let patch = SessionPatch {
            target_temp: Some(next_target),
            ..SessionPatch::default()
        };
        match self.sessions.update(session.id, patch) {
            Ok(()) => {}
            Err(Error::SessionEnded(_)) => return RecipeStep::Ended,
            Err(e) => warn!("Session {}: storing phase target failed: {}", session.id, e),
        }
        sink.emit(&AppEvent::PhaseAdvanced {
            session: session.id,
            phase,
            target_temp: next_target,
        });
        RecipeStep::Hold(next_target)
    }

    fn finish(
        &mut self,
        session: &CookingSession,
        heater: &mut impl ActuatorSink,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        match self.sessions.complete(session.id) {
            Ok(()) => {
                info!("Session {} timer elapsed, cook complete", session.id);
                sink.emit(&AppEvent::SessionCompleted(session.id));
            }
            Err(e) => warn!("Session {}: completing failed: {}", session.id, e),
        }
        match self.command(heater, HeaterMode::Off, Some(session.id), sink) {
            Ok(()) => TickOutcome::Completed(session.id),
            Err(e) => TickOutcome::ActuatorFailed(e),
        }
    }

    /// The session finished under us mid-tick: nothing was written to it,
    /// treat the tick as sessionless.
    fn ended(
        &mut self,
        id: SessionId,
        heater: &mut impl ActuatorSink,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        info!("Session {} ended during the tick, heater off", id);
        match self.command(heater, HeaterMode::Off, None, sink) {
            Ok(()) => TickOutcome::NoSession,
            Err(e) => TickOutcome::ActuatorFailed(e),
        }
    }

    // ── Actuator ──────────────────────────────────────────────

    /// Send `mode` unless it matches the last acknowledged command.  Every
    /// `reassert_every` ticks the command is sent regardless, correcting a
    /// relay that was switched behind our back.
    fn command(
        &mut self,
        heater: &mut impl ActuatorSink,
        mode: HeaterMode,
        session: Option<SessionId>,
        sink: &mut impl EventSink,
    ) -> Result<(), ActuatorError> {
        let reassert = self.tick_count % u64::from(self.reassert_every) == 0;
        if self.last_command == Some(mode) && !reassert {
            return Ok(());
        }

        match heater.set_heater(mode) {
            Ok(()) => {
                if self.last_command != Some(mode) {
                    info!("Heater: {:?} -> {}", self.last_command, mode);
                }
                self.last_command = Some(mode);
                sink.emit(&AppEvent::HeaterCommanded { session, mode });
                Ok(())
            }
            Err(e) => {
                error!("Heater command {} failed: {}", mode, e);
                self.last_command = None;
                sink.emit(&AppEvent::ActuatorFailed { mode, error: e });
                Err(e)
            }
        }
    }
}
