//! Session lifecycle service.
//!
//! [`SessionManager`] enforces the status machine from [`super::lifecycle`]
//! and the phase-index invariant on top of any [`SessionStore`].  Every
//! mutation runs inside [`SessionStore::modify`], so it sees and edits the
//! latest committed record; there are no cross-record transactions.

use log::{debug, info, warn};

use crate::app::ports::{Clock, SessionStore};
use crate::error::{Error, Result};

use super::lifecycle::{SessionAction, next_status};
use super::{
    CookingSession, DEFAULT_LIST_LIMIT, SessionId, SessionPatch, SessionStats, SessionStatus,
    StartSession,
};

pub struct SessionManager<S, C> {
    store: S,
    clock: C,
}

impl<S: SessionStore, C: Clock> SessionManager<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Creation ──────────────────────────────────────────────

    /// Create a new `active` session at phase 0.
    pub fn start(&self, req: StartSession) -> Result<SessionId> {
        if req.total_phases < 1 {
            return Err(Error::InvalidSession("total_phases must be at least 1"));
        }
        if !req.target_temp.is_finite() {
            return Err(Error::InvalidSession("target_temp must be finite"));
        }

        let session = CookingSession {
            id: SessionId(0),
            recipe_id: req.recipe_id,
            recipe_name: req.recipe_name,
            target_temp: req.target_temp,
            target_humidity: req.target_humidity,
            fan_speed: req.fan_speed,
            mode: req.mode,
            status: SessionStatus::Active,
            current_phase: 0,
            total_phases: req.total_phases,
            start_time: self.clock.now(),
            end_time: None,
            actual_temp: None,
            humidity: None,
            notes: req.notes,
            owner: req.owner,
            paused_at: None,
            paused_secs: 0,
        };
        let name = session.recipe_name.clone();
        let id = self.store.insert(session)?;
        info!("Session {} started: {} ({} phases)", id, name, req.total_phases);
        Ok(id)
    }

    /// Start a session only if `req.owner` has no active one.
    ///
    /// This is check-then-act: two callers racing through here can both
    /// succeed.  Callers needing a hard guarantee must serialise starts.
    pub fn start_exclusive(&self, req: StartSession) -> Result<SessionId> {
        if let Some(existing) = self.get_active(req.owner.as_deref())? {
            warn!(
                "Session start refused: {} already active for owner {:?}",
                existing.id, req.owner
            );
            return Err(Error::ConcurrentActiveSession {
                owner: req.owner,
                existing: existing.id,
            });
        }
        self.start(req)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn get(&self, id: SessionId) -> Result<CookingSession> {
        self.store.get(id)?.ok_or(Error::NotFound(id))
    }

    /// The most recently started `active` session, optionally for one owner.
    pub fn get_active(&self, owner: Option<&str>) -> Result<Option<CookingSession>> {
        let active = self.store.list(Some(SessionStatus::Active))?;
        Ok(active
            .into_iter()
            .filter(|s| owner.is_none_or(|o| s.owner.as_deref() == Some(o)))
            .max_by_key(|s| (s.start_time, s.id)))
    }

    /// Sessions newest first, optionally filtered by status.
    pub fn list(
        &self,
        status: Option<SessionStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<CookingSession>> {
        let mut sessions = self.store.list(status)?;
        sessions.sort_by(|a, b| (b.start_time, b.id).cmp(&(a.start_time, a.id)));
        sessions.truncate(limit.unwrap_or(DEFAULT_LIST_LIMIT));
        Ok(sessions)
    }

    pub fn stats(&self) -> Result<SessionStats> {
        let sessions = self.store.list(None)?;
        let mut stats = SessionStats {
            total: sessions.len(),
            ..SessionStats::default()
        };
        for s in &sessions {
            match s.status {
                SessionStatus::Active => stats.active += 1,
                SessionStatus::Paused => stats.paused += 1,
                SessionStatus::Completed => stats.completed += 1,
                SessionStatus::Cancelled => stats.cancelled += 1,
            }
            stats.total_cook_secs += s.duration_secs().unwrap_or(0);
        }
        Ok(stats)
    }

    // ── Phase progression ─────────────────────────────────────

    /// Move to the next phase, clamped at the last one.  Returns the new
    /// index; calling it on the last phase is a no-op.
    pub fn advance_phase(&self, id: SessionId) -> Result<u32> {
        let (next, total, moved) = self.store.modify(id, |session| {
            ensure_live(session)?;
            let last = session.total_phases.saturating_sub(1);
            let next = (session.current_phase + 1).min(last);
            let moved = next != session.current_phase;
            session.current_phase = next;
            Ok((next, session.total_phases, moved))
        })?;

        if moved {
            info!("Session {} advanced to phase {}/{}", id, next + 1, total);
        } else {
            debug!("Session {} already on last phase {}", id, next);
        }
        Ok(next)
    }

    // ── Status transitions ────────────────────────────────────

    pub fn pause(&self, id: SessionId) -> Result<()> {
        self.transition(id, SessionAction::Pause)
    }

    pub fn resume(&self, id: SessionId) -> Result<()> {
        self.transition(id, SessionAction::Resume)
    }

    pub fn complete(&self, id: SessionId) -> Result<()> {
        self.transition(id, SessionAction::Complete)
    }

    pub fn cancel(&self, id: SessionId) -> Result<()> {
        self.transition(id, SessionAction::Cancel)
    }

    fn transition(&self, id: SessionId, action: SessionAction) -> Result<()> {
        let now = self.clock.now();
        let (from, to) = self.store.modify(id, |session| {
            let from = session.status;
            let to = next_status(from, action).ok_or(Error::InvalidTransition {
                session: id,
                from,
                action,
            })?;

            // Close an open pause span before leaving `paused`, whatever the exit.
            if let Some(paused_at) = session.paused_at.take() {
                let span = (now - paused_at).num_seconds().max(0) as u64;
                session.paused_secs = session.paused_secs.saturating_add(span);
            }
            if to == SessionStatus::Paused {
                session.paused_at = Some(now);
            }
            if to.is_terminal() {
                session.end_time = Some(now);
            }
            session.status = to;
            Ok((from, to))
        })?;

        info!("Session {}: {} -> {}", id, from, to);
        Ok(())
    }

    // ── Partial update ────────────────────────────────────────

    /// Apply `patch` to the stored record.  Status and `end_time` are never
    /// touched here.  A finished session only accepts `notes`; any other
    /// field is [`Error::SessionEnded`].
    pub fn update(&self, id: SessionId, patch: SessionPatch) -> Result<()> {
        if let Some(t) = patch.target_temp {
            if !t.is_finite() {
                return Err(Error::InvalidSession("target_temp must be finite"));
            }
        }

        self.store.modify(id, |session| {
            let live_fields = patch.actual_temp.is_some()
                || patch.humidity.is_some()
                || patch.current_phase.is_some()
                || patch.target_temp.is_some();
            if live_fields {
                ensure_live(session)?;
            }

            if let Some(phase) = patch.current_phase {
                if phase >= session.total_phases {
                    return Err(Error::InvalidSession("current_phase out of range"));
                }
                session.current_phase = phase;
            }
            if let Some(t) = patch.target_temp {
                session.target_temp = t;
            }
            if let Some(t) = patch.actual_temp {
                session.actual_temp = Some(t);
            }
            if let Some(h) = patch.humidity {
                session.humidity = Some(h);
            }
            if let Some(notes) = patch.notes {
                session.notes = Some(notes);
            }
            Ok(())
        })
    }
}

fn ensure_live(session: &CookingSession) -> Result<()> {
    if session.status.is_terminal() {
        return Err(Error::SessionEnded(session.id));
    }
    Ok(())
}
