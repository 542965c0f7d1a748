//! Periodic task runtime — four independent loops on one executor.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` for reactor-driven timers (no
//! busy-spinning).  Each loop ticks, then sleeps for its own period:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  Task thread                                                 │
//!  │  ┌────────────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on (drives executor + timers)     │  │
//!  │  │  ┌──────────────────────────────────────────────────┐  │  │
//!  │  │  │  edge_executor::LocalExecutor                    │  │  │
//!  │  │  │                                                  │  │  │
//!  │  │  │  ┌────────┐  ┌────────┐  ┌────────┐  ┌────────┐  │  │  │
//!  │  │  │  │ Heater │  │ Probe  │  │ Health │  │Janitor │  │  │  │
//!  │  │  │  │  5s ⏱  │  │ 10s ⏱  │  │ 10s ⏱  │  │ 30s ⏱  │  │  │  │
//!  │  │  │  └────────┘  └────────┘  └────────┘  └────────┘  │  │  │
//!  │  │  └──────────────────────────────────────────────────┘  │  │
//!  │  └────────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loops share nothing but the stores and the hardware handles.  A
//! hardware handle is only borrowed inside a tick, never across an await.

use core::cell::RefCell;
use core::future::Future;
use core::time::Duration;
use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::app::ports::{
    ActuatorSink, Clock, ConfigError, DeviceStatusStore, EventSink, RecipeBook, SessionStore,
    TemperatureSource,
};
use crate::config::SystemConfig;
use crate::control::HeaterController;
use crate::health::{HealthAggregator, StatusJanitor, StatusProbe};
use crate::session::SessionManager;

type Shared<T> = Rc<RefCell<T>>;

/// Store handles the tasks share with the rest of the system.
#[derive(Clone)]
pub struct Services<S, D, C, R> {
    pub sessions: S,
    pub status: D,
    pub clock: C,
    pub recipes: R,
}

fn period(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms.max(1)))
}

// ── Loops ────────────────────────────────────────────────────

async fn heater_loop<S, C, R, T, A, E>(
    mut ctl: HeaterController<S, C, R>,
    sensor: Shared<T>,
    heater: Shared<A>,
    sink: Shared<E>,
    every: Duration,
) where
    S: SessionStore,
    C: Clock,
    R: RecipeBook,
    T: TemperatureSource,
    A: ActuatorSink,
    E: EventSink,
{
    loop {
        {
            let mut sensor = sensor.borrow_mut();
            let mut heater = heater.borrow_mut();
            let mut sink = sink.borrow_mut();
            ctl.tick(&mut *sensor, &mut *heater, &mut *sink);
        }
        async_io_mini::Timer::after(every).await;
    }
}

async fn probe_loop<D, C, T, A>(
    probe: StatusProbe<D, C>,
    sensor: Shared<T>,
    heater: Shared<A>,
    every: Duration,
) where
    D: DeviceStatusStore,
    C: Clock,
    T: TemperatureSource,
    A: ActuatorSink,
{
    loop {
        {
            let mut sensor = sensor.borrow_mut();
            let heater = heater.borrow();
            if let Err(e) = probe.tick(&mut *sensor, &*heater) {
                warn!("Probe tick failed: {}", e);
            }
        }
        async_io_mini::Timer::after(every).await;
    }
}

async fn health_loop<D, E>(mut agg: HealthAggregator<D>, sink: Shared<E>, every: Duration)
where
    D: DeviceStatusStore,
    E: EventSink,
{
    loop {
        if let Err(e) = agg.tick(&mut *sink.borrow_mut()) {
            debug!("Health tick failed: {}", e);
        }
        async_io_mini::Timer::after(every).await;
    }
}

async fn janitor_loop<D, C, E>(janitor: StatusJanitor<D, C>, sink: Shared<E>, every: Duration)
where
    D: DeviceStatusStore,
    C: Clock,
    E: EventSink,
{
    loop {
        if let Err(e) = janitor.tick(&mut *sink.borrow_mut()) {
            debug!("Janitor tick failed: {}", e);
        }
        async_io_mini::Timer::after(every).await;
    }
}

// ── Entry points ─────────────────────────────────────────────

/// Run all four loops on the current thread until `stop` resolves.
///
/// `config` is validated first; an invalid config starts nothing.
pub fn run_until<S, D, C, R, T, A, E>(
    config: &SystemConfig,
    services: Services<S, D, C, R>,
    sensor: T,
    heater: A,
    sink: E,
    stop: impl Future<Output = ()>,
) -> Result<(), ConfigError>
where
    S: SessionStore,
    D: DeviceStatusStore + Clone,
    C: Clock + Clone,
    R: RecipeBook,
    T: TemperatureSource,
    A: ActuatorSink,
    E: EventSink,
{
    config.validate()?;

    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    let sensor: Shared<T> = Rc::new(RefCell::new(sensor));
    let heater: Shared<A> = Rc::new(RefCell::new(heater));
    let sink: Shared<E> = Rc::new(RefCell::new(sink));

    let Services {
        sessions,
        status,
        clock,
        recipes,
    } = services;
    let controller = HeaterController::new(
        SessionManager::new(sessions, clock.clone()),
        recipes,
        config,
    );
    let probe = StatusProbe::new(status.clone(), clock.clone(), config);
    let aggregator = HealthAggregator::new(status.clone(), config.health_window);
    let retention = chrono::Duration::seconds(i64::from(config.status_retention_secs));
    let janitor = StatusJanitor::new(status, clock, retention);

    executor
        .spawn(heater_loop(
            controller,
            sensor.clone(),
            heater.clone(),
            sink.clone(),
            period(config.heater_interval_ms),
        ))
        .detach();
    executor
        .spawn(probe_loop(
            probe,
            sensor,
            heater,
            period(config.probe_interval_ms),
        ))
        .detach();
    executor
        .spawn(health_loop(
            aggregator,
            sink.clone(),
            period(config.health_interval_ms),
        ))
        .detach();
    executor
        .spawn(janitor_loop(
            janitor,
            sink,
            period(config.janitor_interval_ms),
        ))
        .detach();

    info!(
        "Tasks started: heater {}ms, probe {}ms, health {}ms, janitor {}ms",
        config.heater_interval_ms,
        config.probe_interval_ms,
        config.health_interval_ms,
        config.janitor_interval_ms
    );

    futures_lite::future::block_on(executor.run(stop));
    info!("Tasks stopped");
    Ok(())
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the task thread.
///
/// Hardware handles are often `!Send` (shared simulated pins, borrowed
/// peripherals), so `build` constructs them on the task thread itself.
/// If `build` fails or `config` does not validate, the thread logs the
/// error and exits without running any task.
pub fn spawn<S, D, C, R, T, A, E, B>(
    config: SystemConfig,
    services: Services<S, D, C, R>,
    build: B,
) -> std::io::Result<std::thread::JoinHandle<()>>
where
    S: SessionStore + 'static,
    D: DeviceStatusStore + Clone + 'static,
    C: Clock + Clone + 'static,
    R: RecipeBook + 'static,
    T: TemperatureSource + 'static,
    A: ActuatorSink + 'static,
    E: EventSink + 'static,
    B: FnOnce(&C) -> crate::Result<(T, A, E)> + Send + 'static,
{
    std::thread::Builder::new()
        .name("ovenctl-tasks".into())
        .spawn(move || {
            let (sensor, heater, sink) = match build(&services.clock) {
                Ok(parts) => parts,
                Err(e) => {
                    error!("Hardware init failed: {}", e);
                    return;
                }
            };
            if let Err(e) = run_until(
                &config,
                services,
                sensor,
                heater,
                sink,
                core::future::pending::<()>(),
            ) {
                error!("Tasks not started: {}", e);
            }
        })
}

// ── Tests ────────────────────────────────────────────────────
