//! Configuration loading and round-trip tests.

use geolens::config::Config;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.endpoint, "http://127.0.0.1:8000");
    assert_eq!(
        config.flag_base_url,
        "https://Malith-Rukshan.github.io/animated-country-flags/tgs"
    );
    assert_eq!(config.placeholder_interval(), Duration::from_millis(3000));
    assert_eq!(config.copy_feedback_window(), Duration::from_millis(1500));
    assert_eq!(config.window_width, 960);
    assert_eq!(config.window_height, 640);
    assert_eq!(config.example_ips.len(), 6);
}

// Environment-variable redirection is process-wide, so everything touching
// GEOLENS_CONFIG_DIR lives in this one test.
#[test]
fn test_load_creates_then_reloads_config_file() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    unsafe {
        std::env::set_var("GEOLENS_CONFIG_DIR", temp_dir.path());
    }

    // First load writes the default file.
    let config = Config::load().expect("initial load");
    let config_path = Config::config_path();
    assert!(config_path.exists());
    assert_eq!(config.endpoint, Config::default().endpoint);

    // Edits persist through save/load.
    let mut edited = config;
    edited.endpoint = "https://geo.example".to_string();
    edited.placeholder_interval_ms = 5000;
    edited.save().expect("save");

    let reloaded = Config::load().expect("reload");
    assert_eq!(reloaded.endpoint, "https://geo.example");
    assert_eq!(reloaded.placeholder_interval(), Duration::from_millis(5000));

    // A hand-written partial file fills the rest with defaults.
    std::fs::write(&config_path, "endpoint: \"http://10.0.0.1:8000\"\n").unwrap();
    let partial = Config::load().expect("partial load");
    assert_eq!(partial.endpoint, "http://10.0.0.1:8000");
    assert_eq!(partial.copy_feedback_ms, 1500);
    assert_eq!(partial.example_ips.len(), 6);

    unsafe {
        std::env::remove_var("GEOLENS_CONFIG_DIR");
    }
}

#[test]
fn test_yaml_round_trip_preserves_fields() {
    let mut config = Config::default();
    config.example_ips = vec!["203.0.113.7".to_string()];
    config.window_width = 1200;

    let yaml = serde_yaml_ng::to_string(&config).unwrap();
    let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();
    assert_eq!(parsed.example_ips, vec!["203.0.113.7".to_string()]);
    assert_eq!(parsed.window_width, 1200);
}
