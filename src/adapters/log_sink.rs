//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade (stderr via `env_logger` in the daemon).  A dashboard push
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::health::OverallHealth;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::HeaterCommanded { session, mode } => match session {
                Some(id) => info!("HEAT | session={} mode={}", id, mode),
                None => info!("HEAT | idle mode={}", mode),
            },
            AppEvent::ActuatorFailed { mode, error } => {
                warn!("HEAT | command {} failed: {}", mode, error);
            }
            AppEvent::SensorUnavailable(e) => {
                warn!("SENSOR | unavailable: {}", e);
            }
            AppEvent::PhaseAdvanced {
                session,
                phase,
                target_temp,
            } => {
                info!(
                    "PHASE | session={} phase={} target={:.1}\u{00b0}C",
                    session, phase, target_temp
                );
            }
            AppEvent::SessionCompleted(id) => {
                info!("SESSION | {} completed", id);
            }
            AppEvent::Health(v) => {
                let line = format!(
                    "HEALTH | {} | devices={} online={} offline={} errors={}",
                    v.overall_health, v.total_devices, v.online, v.offline, v.errors
                );
                if v.overall_health == OverallHealth::Healthy {
                    info!("{}", line);
                } else {
                    warn!("{}", line);
                }
            }
            AppEvent::StatusPruned { deleted } => {
                info!("PRUNE | deleted={}", deleted);
            }
        }
    }
}
