//! Mock hardware adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use ovenctl::adapters::memory::{InMemorySessionStore, StaticRecipeBook};
use ovenctl::adapters::time::ManualClock;
use ovenctl::app::events::AppEvent;
use ovenctl::app::ports::{
    ActuatorSink, Clock, ConfigError, ConfigPort, EventSink, SessionStore, TemperatureReading,
    TemperatureSource,
};
use ovenctl::config::SystemConfig;
use ovenctl::control::{HeaterController, HeaterMode};
use ovenctl::error::{ActuatorError, SensorError, StoreError};
use ovenctl::session::phases::{HeatingMode, RecipePhase, StopCondition};
use ovenctl::session::{
    CookingMode, CookingSession, SessionId, SessionManager, SessionStatus, StartSession,
};

// ── Thermometer ───────────────────────────────────────────────

/// Returns queued readings first, then repeats `steady`.
pub struct MockThermometer {
    clock: Arc<ManualClock>,
    queued: VecDeque<Result<f32, SensorError>>,
    pub steady: Result<f32, SensorError>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockThermometer {
    pub fn new(clock: Arc<ManualClock>, celsius: f32) -> Self {
        Self {
            clock,
            queued: VecDeque::new(),
            steady: Ok(celsius),
            reads: 0,
        }
    }

    pub fn push(&mut self, reading: Result<f32, SensorError>) {
        self.queued.push_back(reading);
    }
}

impl TemperatureSource for MockThermometer {
    fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        self.reads += 1;
        let celsius = self.queued.pop_front().unwrap_or(self.steady)?;
        Ok(TemperatureReading {
            celsius,
            at: self.clock.now(),
        })
    }
}

// ── Heater ────────────────────────────────────────────────────

pub struct MockHeater {
    pub calls: Vec<HeaterMode>,
    pub fail: Option<ActuatorError>,
    mode: Option<HeaterMode>,
}

#[allow(dead_code)]
impl MockHeater {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail: None,
            mode: None,
        }
    }

    pub fn last_call(&self) -> Option<HeaterMode> {
        self.calls.last().copied()
    }

    pub fn is_on(&self) -> bool {
        self.mode.is_some_and(HeaterMode::is_on)
    }
}

impl Default for MockHeater {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorSink for MockHeater {
    fn set_heater(&mut self, mode: HeaterMode) -> Result<(), ActuatorError> {
        self.calls.push(mode);
        if let Some(e) = self.fail {
            self.mode = None;
            return Err(e);
        }
        self.mode = Some(mode);
        Ok(())
    }

    fn heater_state(&self) -> Result<HeaterMode, ActuatorError> {
        match self.fail {
            Some(e) => Err(e),
            None => Ok(self.mode.unwrap_or(HeaterMode::Off)),
        }
    }
}

// ── Session store ─────────────────────────────────────────────

/// Session store where, once armed, the next listing is followed by a
/// user cancelling every active session.  The caller keeps the stale
/// snapshot it was handed.
pub struct CancelAfterListing {
    inner: Arc<InMemorySessionStore>,
    clock: Arc<ManualClock>,
    pub armed: AtomicBool,
}

#[allow(dead_code)]
impl CancelAfterListing {
    pub fn new(inner: Arc<InMemorySessionStore>, clock: Arc<ManualClock>) -> Self {
        Self {
            inner,
            clock,
            armed: AtomicBool::new(false),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl SessionStore for CancelAfterListing {
    fn insert(&self, session: CookingSession) -> Result<SessionId, StoreError> {
        self.inner.insert(session)
    }

    fn get(&self, id: SessionId) -> Result<Option<CookingSession>, StoreError> {
        self.inner.get(id)
    }

    fn modify<T>(
        &self,
        id: SessionId,
        edit: impl FnOnce(&mut CookingSession) -> ovenctl::Result<T>,
    ) -> ovenctl::Result<T> {
        self.inner.modify(id, edit)
    }

    fn list(&self, status: Option<SessionStatus>) -> Result<Vec<CookingSession>, StoreError> {
        let rows = self.inner.list(status)?;
        if self.armed.swap(false, Ordering::SeqCst) {
            let user = SessionManager::new(self.inner.clone(), self.clock.clone());
            for s in rows.iter().filter(|s| s.status == SessionStatus::Active) {
                user.cancel(s.id).expect("cancel active session");
            }
        }
        Ok(rows)
    }
}

// ── Config ────────────────────────────────────────────────────

/// In-memory [`ConfigPort`] with the same validation as the file adapter.
#[derive(Default)]
pub struct MockConfig {
    stored: RefCell<Option<SystemConfig>>,
    pub saves: RefCell<usize>,
}

impl ConfigPort for MockConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let cfg = self.stored.borrow().clone().ok_or(ConfigError::NotFound)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase_advances(&self) -> Vec<(u32, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseAdvanced {
                    phase, target_temp, ..
                } => Some((*phase, *target_temp)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub type Sessions = SessionManager<Arc<InMemorySessionStore>, Arc<ManualClock>>;
pub type Controller =
    HeaterController<Arc<InMemorySessionStore>, Arc<ManualClock>, Arc<StaticRecipeBook>>;

pub fn phase(name: &str, temperature: f32, minutes: u32, order: u32) -> RecipePhase {
    RecipePhase {
        name: name.to_owned(),
        description: String::new(),
        temperature,
        duration_minutes: minutes,
        heating_mode: HeatingMode::Conventional,
        stop_condition: StopCondition::Time,
        icon: "flame".to_owned(),
        order,
    }
}

#[allow(dead_code)]
pub fn start_request(recipe: Option<&str>, target: f32, total_phases: u32) -> StartSession {
    StartSession {
        recipe_id: recipe.map(str::to_owned),
        recipe_name: "Test bake".to_owned(),
        target_temp: target,
        target_humidity: None,
        fan_speed: 1,
        mode: if recipe.is_some() {
            CookingMode::Timer
        } else {
            CookingMode::Manual
        },
        total_phases,
        notes: None,
        owner: None,
    }
}

pub struct Rig {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemorySessionStore>,
    pub recipes: Arc<StaticRecipeBook>,
    pub sessions: Sessions,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(InMemorySessionStore::new());
        let recipes = Arc::new(StaticRecipeBook::new());
        let sessions = SessionManager::new(store.clone(), clock.clone());
        Self {
            clock,
            store,
            recipes,
            sessions,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn controller(&self, config: &SystemConfig) -> Controller {
        HeaterController::new(
            SessionManager::new(self.store.clone(), self.clock.clone()),
            self.recipes.clone(),
            config,
        )
    }
}
