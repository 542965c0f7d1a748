//! Hardware drivers generic over `embedded_hal` traits.

pub mod heater;
