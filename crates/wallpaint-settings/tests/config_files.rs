use std::fs;
use tempfile::TempDir;
use wallpaint_settings::{Config, ConfigError, MissingInputPolicy, SettingsError};

fn customized() -> Config {
    let mut config = Config::new();
    config.planner.base_url = "https://planner.example.com/api/v1".to_string();
    config.planner.timeout_ms = Some(1500);
    config.animation.step_delay_ms = 12.5;
    config.surface.width_px = 1024;
    config.surface.height_px = 512;
    config.deploy.missing_input_policy = MissingInputPolicy::Report;
    config.deploy.wall_width = 6.0;
    config.deploy.obstacle.x = 2.5;
    config
}

#[test]
fn test_toml_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let config = customized();
    config.save_to_file(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[planner]"));
    assert!(text.contains("missing_input_policy = \"report\""));

    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unset_timeout_is_omitted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    Config::new().save_to_file(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("timeout_ms"));
    assert_eq!(Config::load_from_file(&path).unwrap().planner.timeout_ms, None);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("wallpaint").join("config.toml");
    Config::new().save_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_file_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[surface]\nwidth_px = 0\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::ValueOutOfRange { .. })
    ));
}

#[test]
fn test_malformed_toml_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[planner\nbase_url = ").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_default_path_is_under_wallpaint_dir() {
    if let Ok(path) = Config::default_path() {
        assert!(path.ends_with("wallpaint/config.toml"));
    }
}
