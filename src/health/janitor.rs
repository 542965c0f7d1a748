//! Retention for the device status ledger.

use chrono::Duration;
use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{Clock, DeviceStatusStore, EventSink};
use crate::error::Result;

pub struct StatusJanitor<D, C> {
    store: D,
    clock: C,
    retention: Duration,
}

impl<D: DeviceStatusStore, C: Clock> StatusJanitor<D, C> {
    pub fn new(store: D, clock: C, retention: Duration) -> Self {
        Self {
            store,
            clock,
            retention,
        }
    }

    /// Delete observations strictly older than `now - retention`.  An
    /// observation exactly at the cutoff is kept.
    pub fn tick(&self, sink: &mut impl EventSink) -> Result<usize> {
        let cutoff = self.clock.now() - self.retention;
        let deleted = match self.store.delete_older_than(cutoff) {
            Ok(n) => n,
            Err(e) => {
                warn!("Janitor: cleanup failed: {}", e);
                return Err(e.into());
            }
        };

        if deleted > 0 {
            info!("Janitor: deleted {} observations older than {}", deleted, cutoff);
            sink.emit(&AppEvent::StatusPruned { deleted });
        } else {
            debug!("Janitor: nothing older than {}", cutoff);
        }
        Ok(deleted)
    }
}
