use std::collections::HashMap;
use std::time::Duration;

use tom_and_jerry::config::Settings;
use tom_and_jerry::entities::Level;
use tom_and_jerry::error::GameError;

fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, GameError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn defaults_without_variables() {
    let settings = settings_from(&[]).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.fps, 30);
    assert_eq!(settings.seed, None);
    assert_eq!(settings.serial_path, None);
    assert_eq!(settings.start_level, Level::One);
}

#[test]
fn reads_every_variable() {
    let settings = settings_from(&[
        ("TOMJERRY_FPS", "60"),
        ("TOMJERRY_SEED", " 1234 "),
        ("TOMJERRY_SERIAL", "/tmp/serial.log"),
    ])
    .unwrap();
    assert_eq!(settings.fps, 60);
    assert_eq!(settings.seed, Some(1234));
    assert_eq!(settings.serial_path.as_deref(), Some("/tmp/serial.log"));
}

#[test]
fn rejects_out_of_range_fps() {
    for bad in ["0", "241", "fast", "-3"] {
        let err = settings_from(&[("TOMJERRY_FPS", bad)]).unwrap_err();
        assert!(
            matches!(&err, GameError::InvalidSetting { name: "TOMJERRY_FPS", value } if value == bad),
            "{bad}: {err}"
        );
    }
}

#[test]
fn rejects_bad_seed() {
    let err = settings_from(&[("TOMJERRY_SEED", "abc")]).unwrap_err();
    assert!(matches!(err, GameError::InvalidSetting { name: "TOMJERRY_SEED", .. }));
    assert!(err.to_string().contains("TOMJERRY_SEED"));
}

#[test]
fn blank_serial_path_is_ignored() {
    let settings = settings_from(&[("TOMJERRY_SERIAL", "  ")]).unwrap();
    assert_eq!(settings.serial_path, None);
}

#[test]
fn frame_period_follows_fps() {
    let settings = settings_from(&[("TOMJERRY_FPS", "50")]).unwrap();
    assert_eq!(settings.frame_period(), Duration::from_millis(20));
}

#[test]
fn start_level_by_number() {
    let settings = settings_from(&[("TOMJERRY_LEVEL", "2")]).unwrap();
    assert_eq!(settings.start_level, Level::Two);
}

#[test]
fn rejects_missing_level() {
    let err = settings_from(&[("TOMJERRY_LEVEL", "3")]).unwrap_err();
    assert!(matches!(err, GameError::UnknownLevel(3)), "{err}");

    let err = settings_from(&[("TOMJERRY_LEVEL", "two")]).unwrap_err();
    assert!(matches!(err, GameError::InvalidSetting { name: "TOMJERRY_LEVEL", .. }));
}
