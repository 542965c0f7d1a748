//! Heater control.
//!
//! The oven has two heating elements (back and front).  The control loop
//! only decides on/off; which elements "on" means is configuration.

pub mod heater;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use heater::{HeaterController, TickOutcome};

/// Element combination driven by the relay bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaterMode {
    Off,
    Back,
    Front,
    #[serde(alias = "on")]
    Both,
}

impl HeaterMode {
    pub const fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }

    pub const fn back_energised(self) -> bool {
        matches!(self, Self::Back | Self::Both)
    }

    pub const fn front_energised(self) -> bool {
        matches!(self, Self::Front | Self::Both)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Back => "back",
            Self::Front => "front",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for HeaterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
