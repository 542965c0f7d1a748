//! Host simulation of the oven hardware.
//!
//! ```text
//!   RelayHeater ──set_high/low──▶ SimPin (back) ──┐
//!               ──set_high/low──▶ SimPin (front) ─┤ level
//!                                                 ▼
//!                                      SimOven (thermal model) ──read──▶ TemperatureSource
//! ```
//!
//! Pins are shared handles: the relay driver owns one clone, the oven
//! model reads another.  Everything here is single-threaded (`Rc`).

use core::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

use crate::app::ports::{Clock, TemperatureReading, TemperatureSource};
use crate::error::SensorError;

// ── Simulated GPIO ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct PinState {
    level: Cell<bool>,
    broken: Cell<bool>,
}

/// Output pin backed by shared memory.  Clones observe the same level.
#[derive(Clone, Default)]
pub struct SimPin {
    state: Rc<PinState>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set_high(&self) -> bool {
        self.state.level.get()
    }

    /// Change the level without going through the driver, as a stuck or
    /// hand-operated relay would.
    pub fn force(&self, high: bool) {
        self.state.level.set(high);
    }

    /// While broken, writes fail and the level does not change.
    pub fn break_pin(&self, broken: bool) {
        self.state.broken.set(broken);
    }

    fn write(&self, high: bool) -> Result<(), SimPinError> {
        if self.state.broken.get() {
            return Err(SimPinError);
        }
        self.state.level.set(high);
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

// ── Thermal model ────────────────────────────────────────────

/// Plausible chamber range; anything outside is reported as a sensor fault.
const SENSOR_RANGE_C: core::ops::RangeInclusive<f32> = -40.0..=400.0;

/// First-order oven model: each energised element adds a fixed heating
/// rate, and the chamber loses heat toward ambient in proportion to the
/// difference.
pub struct SimOven<C> {
    clock: C,
    back: SimPin,
    front: SimPin,
    celsius: f32,
    ambient: f32,
    /// °C per second contributed by one element.
    element_rate: f32,
    /// Fraction of the ambient difference lost per second.
    loss: f32,
    last_step: DateTime<Utc>,
}

impl<C: Clock> SimOven<C> {
    pub fn new(clock: C, back: SimPin, front: SimPin, ambient: f32) -> Self {
        let last_step = clock.now();
        Self {
            clock,
            back,
            front,
            celsius: ambient,
            ambient,
            element_rate: 0.6,
            loss: 0.002,
            last_step,
        }
    }

    pub fn celsius(&self) -> f32 {
        self.celsius
    }

    /// Override the chamber temperature, e.g. to inject an implausible value.
    pub fn set_celsius(&mut self, celsius: f32) {
        self.celsius = celsius;
    }

    /// Integrate the model up to the current clock reading.
    fn step(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        let dt = (now - self.last_step).num_milliseconds().max(0) as f32 / 1000.0;
        self.last_step = now;

        let elements = u8::from(self.back.is_set_high()) + u8::from(self.front.is_set_high());
        // Integrate in 1 s slices so long gaps stay stable.
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(1.0);
            let gain = f32::from(elements) * self.element_rate;
            let leak = self.loss * (self.celsius - self.ambient);
            self.celsius += (gain - leak) * h;
            remaining -= h;
        }
        now
    }
}

impl<C: Clock> TemperatureSource for SimOven<C> {
    fn read(&mut self) -> Result<TemperatureReading, SensorError> {
        let at = self.step();
        if !self.celsius.is_finite() || !SENSOR_RANGE_C.contains(&self.celsius) {
            return Err(SensorError::OutOfRange);
        }
        Ok(TemperatureReading {
            celsius: self.celsius,
            at,
        })
    }
}
