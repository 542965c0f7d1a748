//! Oven control core library.
//!
//! Cooking session lifecycle, the bang-bang heater loop and device health
//! monitoring, all behind port traits so the same logic runs against real
//! relays, the host simulation or test doubles.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod health;
pub mod runtime;
pub mod session;

pub use error::{Error, Result};
