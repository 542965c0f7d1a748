//! Two-element relay heater driver.
//!
//! The oven has a back and a front heating element, each switched by its
//! own relay channel (GPIO 23 and 24 on the reference board).  The driver
//! is generic over `embedded_hal` output pins, so the same code drives real
//! GPIO or the simulated pins in [`crate::adapters::sim`].
//!
//! ## Safety contract
//!
//! If a channel write fails the driver tries to drop both channels low and
//! reports its state as unknown until the next successful command.

use embedded_hal::digital::OutputPin;
use log::{error, warn};

use crate::app::ports::ActuatorSink;
use crate::control::HeaterMode;
use crate::error::ActuatorError;

pub struct RelayHeater<B, F> {
    back: B,
    front: F,
    /// `None` after a failed write: relay positions are not known.
    mode: Option<HeaterMode>,
}

impl<B: OutputPin, F: OutputPin> RelayHeater<B, F> {
    /// Take ownership of both relay pins and switch them off.
    pub fn new(back: B, front: F) -> Result<Self, ActuatorError> {
        let mut driver = Self {
            back,
            front,
            mode: None,
        };
        driver.drive(HeaterMode::Off)?;
        Ok(driver)
    }

    fn drive(&mut self, mode: HeaterMode) -> Result<(), ActuatorError> {
        let back = set_channel(&mut self.back, mode.back_energised());
        let front = set_channel(&mut self.front, mode.front_energised());
        if back.is_ok() && front.is_ok() {
            self.mode = Some(mode);
            return Ok(());
        }

        error!("Relay heater: channel write failed while switching to {}", mode);
        self.mode = None;
        let back_off = set_channel(&mut self.back, false);
        let front_off = set_channel(&mut self.front, false);
        if back_off.is_err() || front_off.is_err() {
            warn!("Relay heater: fail-safe shutdown incomplete");
        }
        Err(ActuatorError::GpioWriteFailed)
    }
}

fn set_channel(pin: &mut impl OutputPin, on: bool) -> Result<(), ActuatorError> {
    let res = if on { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| ActuatorError::GpioWriteFailed)
}

impl<B: OutputPin, F: OutputPin> ActuatorSink for RelayHeater<B, F> {
    fn set_heater(&mut self, mode: HeaterMode) -> Result<(), ActuatorError> {
        self.drive(mode)
    }

    fn heater_state(&self) -> Result<HeaterMode, ActuatorError> {
        self.mode.ok_or(ActuatorError::GpioWriteFailed)
    }
}
