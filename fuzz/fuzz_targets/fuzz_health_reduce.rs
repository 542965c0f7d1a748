//! Fuzz target: latest-wins reduction and verdict over arbitrary rows.
//!
//! Builds observations from raw bytes (4 bytes per row: device, status,
//! timestamp) and checks the verdict's counters never disagree.

#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use ovenctl::health::{DeviceObservation, DeviceStatus, DeviceType, reduce_latest, verdict};

fuzz_target!(|data: &[u8]| {
    let rows: Vec<DeviceObservation> = data
        .chunks_exact(4)
        .map(|c| DeviceObservation {
            device_type: DeviceType::Other(format!("kind-{}", c[0] % 3)),
            device_id: format!("dev-{}", c[0]),
            status: match c[1] % 3 {
                0 => DeviceStatus::Online,
                1 => DeviceStatus::Offline,
                _ => DeviceStatus::Error,
            },
            last_reading: None,
            timestamp: Utc
                .timestamp_opt(i64::from(u16::from_le_bytes([c[2], c[3]])), 0)
                .unwrap(),
            metadata: None,
        })
        .collect();

    let latest = reduce_latest(&rows);
    assert!(latest.len() <= rows.len());
    let v = verdict(latest);
    assert_eq!(v.online + v.offline + v.errors, v.total_devices);
});
