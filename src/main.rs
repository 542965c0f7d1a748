//! OvenCtl — host daemon entry point.
//!
//! Hexagonal architecture with four periodic tasks.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimOven            RelayHeater      LogEventSink   JsonConfig │
//! │  (TemperatureSource)(ActuatorSink)   (EventSink)    (Config)   │
//! │  InMemorySessionStore  InMemoryStatusStore  StaticRecipeBook   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  HeaterController · StatusProbe · HealthAggregator ·   │    │
//! │  │  StatusJanitor · SessionManager (pure logic)           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use log::{error, info, warn};

use ovenctl::adapters::config_file::JsonConfigFile;
use ovenctl::adapters::log_sink::LogEventSink;
use ovenctl::adapters::memory::{InMemorySessionStore, InMemoryStatusStore, StaticRecipeBook};
use ovenctl::adapters::sim::{SimOven, SimPin};
use ovenctl::adapters::time::SystemClock;
use ovenctl::app::ports::{ConfigError, ConfigPort};
use ovenctl::config::SystemConfig;
use ovenctl::drivers::heater::RelayHeater;
use ovenctl::runtime::{self, Services};
use ovenctl::session::phases::{HeatingMode, RecipePhase, StopCondition};
use ovenctl::session::{CookingMode, SessionManager, StartSession};

const DEFAULT_CONFIG_PATH: &str = "ovenctl.json";
const AMBIENT_C: f32 = 21.0;

struct Args {
    config: String,
    demo: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: DEFAULT_CONFIG_PATH.to_owned(),
        demo: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                args.config = it.next().context("--config needs a path")?;
            }
            "--demo" => args.demo = true,
            "-h" | "--help" => {
                println!("usage: ovenctl [--config <path>] [--demo]");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn load_config(path: &str) -> SystemConfig {
    let port = JsonConfigFile::new(path);
    match port.load() {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound) => {
            info!("No config at {}, using defaults", path);
            SystemConfig::default()
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    }
}

fn demo_phase(name: &str, temperature: f32, minutes: u32, mode: HeatingMode, order: u32) -> RecipePhase {
    RecipePhase {
        name: name.to_owned(),
        description: String::new(),
        temperature,
        duration_minutes: minutes,
        heating_mode: mode,
        stop_condition: StopCondition::Time,
        icon: "flame".to_owned(),
        order,
    }
}

/// Register a short three-phase bake and start it.
fn seed_demo(
    recipes: &StaticRecipeBook,
    sessions: &SessionManager<Arc<InMemorySessionStore>, SystemClock>,
    owner: Option<String>,
) -> ovenctl::Result<()> {
    let phases = vec![
        demo_phase("Preheat", 200.0, 3, HeatingMode::Preheat, 0),
        demo_phase("Bake", 180.0, 5, HeatingMode::Convection, 1),
        demo_phase("Brown", 220.0, 2, HeatingMode::Grill, 2),
    ];
    let req = StartSession {
        recipe_id: Some("demo-loaf".to_owned()),
        recipe_name: "Demo loaf".to_owned(),
        target_temp: phases[0].temperature,
        target_humidity: None,
        fan_speed: 2,
        mode: CookingMode::Timer,
        total_phases: phases.len() as u32,
        notes: None,
        owner,
    };
    recipes.insert("demo-loaf", phases);
    let id = sessions.start_exclusive(req)?;
    info!("Demo session {} started", id);
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    info!("ovenctl {} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config);

    let clock = SystemClock;
    let session_store = Arc::new(InMemorySessionStore::new());
    let status_store = Arc::new(InMemoryStatusStore::new());
    let recipes = Arc::new(StaticRecipeBook::new());

    if args.demo {
        let sessions = SessionManager::new(session_store.clone(), clock);
        seed_demo(&recipes, &sessions, config.session_owner.clone())?;
    }

    let services = Services {
        sessions: session_store,
        status: status_store,
        clock,
        recipes,
    };

    let handle = runtime::spawn(config, services, |clock: &SystemClock| {
        let (back, front) = (SimPin::new(), SimPin::new());
        let oven = SimOven::new(*clock, back.clone(), front.clone(), AMBIENT_C);
        let heater = RelayHeater::new(back, front)?;
        Ok((oven, heater, LogEventSink::new()))
    })
    .context("spawning task thread")?;

    handle.join().map_err(|_| {
        error!("Task thread panicked");
        anyhow!("task thread panicked")
    })
}
