//! Guard config из JSON файла

use bevy::prelude::*;
use warden_simulation::ai::brain::sandbox::SandboxEnvironment;
use warden_simulation::ai::{ConfigLoadError, ConfigurationError};
use warden_simulation::{GuardBrain, GuardConfig, PatrolMovement};

/// Пишет JSON во временный файл (уникальное имя на тест)
fn write_config(name: &str, json: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "warden_{}_{}.json",
        name,
        std::process::id()
    ));
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_load_patrol_config_from_file() {
    let path = write_config(
        "patrol",
        r#"{
            "move_speed": 4.5,
            "alert_distance": 7.0,
            "catch_distance": 1.5,
            "min_wait": 0.5,
            "max_wait": 2.0,
            "alert_check_count": 5,
            "can_patrol": true,
            "patrol_waypoints": [[0.0, 10.0], [10.0, 10.0]],
            "return_position": [1.0, 2.0],
            "patrol_movement": "Leaky",
            "rng_seed": 99
        }"#,
    );

    let config = GuardConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.move_speed, 4.5);
    assert_eq!(config.alert_check_count, 5);
    assert_eq!(config.return_position, Vec2::new(1.0, 2.0));
    assert_eq!(config.patrol_movement, PatrolMovement::Leaky);
    assert_eq!(config.rng_seed, Some(99));
    assert!(config.can_patrol);

    // rng_seed из файла важнее fallback seed'а
    let mut env = SandboxEnvironment::new(Vec2::ZERO);
    let mut a: GuardBrain<u32> = GuardBrain::new(config.clone(), 1).unwrap();
    let mut b: GuardBrain<u32> = GuardBrain::new(config, 2).unwrap();
    a.start(&mut env);
    b.start(&mut env);
    assert_eq!(a.idle_wait(), b.idle_wait());
}

#[test]
fn test_invalid_config_file_rejected() {
    let path = write_config("invalid", r#"{ "min_wait": 5.0, "max_wait": 1.0 }"#);

    let result = GuardConfig::from_json_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(
        result,
        Err(ConfigLoadError::Invalid(ConfigurationError::InvalidWaitRange { .. }))
    ));
}

#[test]
fn test_missing_config_file() {
    let path = std::env::temp_dir().join("warden_does_not_exist.json");

    let result = GuardConfig::from_json_file(&path);
    assert!(matches!(result, Err(ConfigLoadError::Io(_))));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = GuardConfig::default()
        .with_patrol(vec![Vec2::new(3.0, 4.0)])
        .with_seed(7);

    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(GuardConfig::from_json_str(&json).unwrap(), config);
}
