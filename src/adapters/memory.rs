//! In-memory store adapters.
//!
//! Back the store ports with `Mutex`-guarded collections.  Used by the host
//! daemon and by every test; a database-backed adapter would implement the
//! same traits.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};

use crate::app::ports::{DeviceStatusStore, RecipeBook, SessionStore};
use crate::error::{Error, StoreError};
use crate::health::{DeviceObservation, DeviceType};
use crate::session::phases::RecipePhase;
use crate::session::{CookingSession, SessionId, SessionStatus};

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock().map_err(|_| StoreError::Poisoned)
}

// ── Sessions ─────────────────────────────────────────────────

#[derive(Default)]
struct SessionTable {
    next_id: u64,
    rows: BTreeMap<SessionId, CookingSession>,
}

#[derive(Default)]
pub struct InMemorySessionStore {
    table: Mutex<SessionTable>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, mut session: CookingSession) -> Result<SessionId, StoreError> {
        let mut t = lock(&self.table)?;
        t.next_id += 1;
        let id = SessionId(t.next_id);
        session.id = id;
        t.rows.insert(id, session);
        Ok(id)
    }

    fn get(&self, id: SessionId) -> Result<Option<CookingSession>, StoreError> {
        Ok(lock(&self.table)?.rows.get(&id).cloned())
    }

    fn modify<T>(
        &self,
        id: SessionId,
        edit: impl FnOnce(&mut CookingSession) -> crate::Result<T>,
    ) -> crate::Result<T> {
        let mut t = lock(&self.table)?;
        let row = t.rows.get_mut(&id).ok_or(Error::NotFound(id))?;
        let mut draft = row.clone();
        let out = edit(&mut draft)?;
        draft.id = id;
        *row = draft;
        Ok(out)
    }

    fn list(&self, status: Option<SessionStatus>) -> Result<Vec<CookingSession>, StoreError> {
        Ok(lock(&self.table)?
            .rows
            .values()
            .filter(|s| status.is_none_or(|st| s.status == st))
            .cloned()
            .collect())
    }
}

// ── Device status ledger ─────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStatusStore {
    rows: Mutex<Vec<DeviceObservation>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map_or(0, |r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeviceStatusStore for InMemoryStatusStore {
    fn insert(&self, observation: DeviceObservation) -> Result<(), StoreError> {
        lock(&self.rows)?.push(observation);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<DeviceObservation>, StoreError> {
        // Newest insertion first, then a stable sort keeps that order on ties.
        let mut rows: Vec<_> = lock(&self.rows)?.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }

    fn recent_by_type(
        &self,
        device_type: &DeviceType,
        limit: usize,
    ) -> Result<Vec<DeviceObservation>, StoreError> {
        let mut rows: Vec<_> = lock(&self.rows)?
            .iter()
            .rev()
            .filter(|o| &o.device_type == device_type)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut rows = lock(&self.rows)?;
        let before = rows.len();
        rows.retain(|o| o.timestamp >= cutoff);
        Ok(before - rows.len())
    }
}

// ── Recipes ──────────────────────────────────────────────────

/// Recipe phases registered at start-up.
#[derive(Default)]
pub struct StaticRecipeBook {
    recipes: RwLock<HashMap<String, Vec<RecipePhase>>>,
}

impl StaticRecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a recipe.  Phases are stored sorted by `order`.
    pub fn insert(&self, recipe_id: impl Into<String>, mut phases: Vec<RecipePhase>) {
        phases.sort_by_key(|p| p.order);
        let mut recipes = self
            .recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        recipes.insert(recipe_id.into(), phases);
    }
}

impl RecipeBook for StaticRecipeBook {
    fn phases(&self, recipe_id: &str) -> Result<Option<Vec<RecipePhase>>, StoreError> {
        let recipes = self.recipes.read().map_err(|_| StoreError::Poisoned)?;
        Ok(recipes.get(recipe_id).cloned())
    }
}
