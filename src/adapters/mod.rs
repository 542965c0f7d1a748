//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements                      | Connects to             |
//! |----------------|---------------------------------|-------------------------|
//! | `config_file`  | ConfigPort                      | JSON file on disk       |
//! | `log_sink`     | EventSink                       | `log` facade            |
//! | `memory`       | SessionStore, DeviceStatusStore | in-process collections  |
//! |                | RecipeBook                      |                         |
//! | `sim`          | TemperatureSource               | thermal model + GPIO    |
//! | `time`         | Clock                           | host wall clock         |
//!
//! The relay heater driver (`ActuatorSink`) lives in [`crate::drivers`].

pub mod config_file;
pub mod log_sink;
pub mod memory;
pub mod sim;
pub mod time;
