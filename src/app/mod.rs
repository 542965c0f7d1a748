//! Application boundary — ports and outbound events.
//!
//! The domain modules ([`crate::session`], [`crate::control`],
//! [`crate::health`]) interact with hardware, storage and logging only
//! through the traits in [`ports`], keeping them fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
