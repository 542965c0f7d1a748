//! Periodic health verdict over the device status ledger.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{DeviceStatusStore, EventSink};
use crate::error::Result;

use super::{
    DeviceObservation, DeviceType, HealthVerdict, MAX_TRACKED_DEVICES, OverallHealth,
    reduce_latest, verdict,
};

pub struct HealthAggregator<D> {
    store: D,
    window: usize,
    last: Option<HealthVerdict>,
}

impl<D: DeviceStatusStore> HealthAggregator<D> {
    /// `window` is the number of most recent observations each verdict
    /// considers, at most [`MAX_TRACKED_DEVICES`].  A larger window is
    /// clamped so the reduction can never run out of device slots.
    pub fn new(store: D, window: usize) -> Self {
        if window > MAX_TRACKED_DEVICES {
            warn!(
                "Health window {} exceeds {} tracked devices, clamping",
                window, MAX_TRACKED_DEVICES
            );
        }
        Self {
            store,
            window: window.min(MAX_TRACKED_DEVICES),
            last: None,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Verdict from the most recent tick, if any tick succeeded yet.
    pub fn last_verdict(&self) -> Option<&HealthVerdict> {
        self.last.as_ref()
    }

    /// Compute a fresh verdict without caching it.
    pub fn evaluate(&self) -> Result<HealthVerdict> {
        let recent = self.store.recent(self.window)?;
        Ok(verdict(reduce_latest(&recent)))
    }

    /// Latest observation per device, optionally for one device type.  A
    /// type filter is applied before the window, so chatty devices of other
    /// types cannot push it out.
    pub fn current_status(&self, device_type: Option<&DeviceType>) -> Result<Vec<DeviceObservation>> {
        let recent = match device_type {
            Some(t) => self.store.recent_by_type(t, self.window)?,
            None => self.store.recent(self.window)?,
        };
        Ok(reduce_latest(&recent))
    }

    /// Recompute, cache and publish the verdict.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> Result<&HealthVerdict> {
        let v = match self.evaluate() {
            Ok(v) => v,
            Err(e) => {
                warn!("Health tick skipped: {}", e);
                return Err(e);
            }
        };

        let previous = self.last.as_ref().map(|p| p.overall_health);
        if previous != Some(v.overall_health) {
            match v.overall_health {
                OverallHealth::Healthy => info!("Health: {:?} -> healthy", previous),
                _ => warn!(
                    "Health: {:?} -> {} ({} offline, {} errors)",
                    previous, v.overall_health, v.offline, v.errors
                ),
            }
        } else {
            debug!("Health: {} ({} devices)", v.overall_health, v.total_devices);
        }

        sink.emit(&AppEvent::Health(v.clone()));
        Ok(self.last.insert(v))
    }
}
