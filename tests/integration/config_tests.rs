//! Integration tests for the configuration port.

use ovenctl::app::ports::{ConfigError, ConfigPort};
use ovenctl::config::SystemConfig;
use ovenctl::control::HeaterMode;

use crate::mock_hw::MockConfig;

#[test]
fn empty_port_reports_not_found() {
    assert!(matches!(MockConfig::default().load(), Err(ConfigError::NotFound)));
}

#[test]
fn saved_config_loads_back() {
    let port = MockConfig::default();
    let cfg = SystemConfig {
        heater_on_mode: HeaterMode::Front,
        session_owner: Some("kitchen".into()),
        ..SystemConfig::default()
    };
    port.save(&cfg).unwrap();
    assert_eq!(port.load().unwrap(), cfg);
    assert_eq!(*port.saves.borrow(), 1);
}

#[test]
fn invalid_config_is_never_stored() {
    let port = MockConfig::default();
    let cfg = SystemConfig {
        heater_device_id: "main_temp_sensor".into(),
        ..SystemConfig::default()
    };
    assert!(matches!(port.save(&cfg), Err(ConfigError::ValidationFailed(_))));
    assert!(matches!(port.load(), Err(ConfigError::NotFound)));
    assert_eq!(*port.saves.borrow(), 0);
}

#[test]
fn json_uses_defaults_for_missing_fields() {
    let cfg: SystemConfig = serde_json::from_str(r#"{ "heater_on_mode": "on" }"#).unwrap();
    assert_eq!(cfg.heater_on_mode, HeaterMode::Both);
    assert_eq!(cfg.heater_interval_ms, SystemConfig::default().heater_interval_ms);
    cfg.validate().unwrap();
}
