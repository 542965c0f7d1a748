//! Fuzz target: configuration decoding and validation.
//!
//! Any byte string must either fail to parse, fail validation, or yield a
//! config that survives a save/load round through JSON unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ovenctl::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(cfg) = serde_json::from_slice::<SystemConfig>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let json = serde_json::to_vec(&cfg).expect("valid config serialises");
    let back: SystemConfig = serde_json::from_slice(&json).expect("own output parses");
    assert_eq!(back, cfg);
});
