//! Configuration for the lookup widget.
//!
//! Stored as YAML under the platform config directory
//! (`~/.config/geolens/config.yaml` on Linux). A default file is written on
//! first run. Every field carries a serde default so configs written by
//! older versions keep loading.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::placeholder::EXAMPLE_IPS;

fn default_endpoint() -> String {
    // The lookup service's default development bind address.
    "http://127.0.0.1:8000".to_string()
}

fn default_flag_base_url() -> String {
    "https://Malith-Rukshan.github.io/animated-country-flags/tgs".to_string()
}

fn default_placeholder_interval_ms() -> u64 {
    3000
}

fn default_copy_feedback_ms() -> u64 {
    1500
}

fn default_window_width() -> u32 {
    960
}

fn default_window_height() -> u32 {
    640
}

fn default_example_ips() -> Vec<String> {
    EXAMPLE_IPS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GeoIP lookup service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base URL of the animated flag asset repository.
    #[serde(default = "default_flag_base_url")]
    pub flag_base_url: String,

    /// How often the input placeholder rotates to the next example address.
    #[serde(default = "default_placeholder_interval_ms")]
    pub placeholder_interval_ms: u64,

    /// How long a copy button shows its confirmation glyph.
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,

    /// Initial window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Initial window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Example addresses cycled through the input placeholder.
    #[serde(default = "default_example_ips")]
    pub example_ips: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            flag_base_url: default_flag_base_url(),
            placeholder_interval_ms: default_placeholder_interval_ms(),
            copy_feedback_ms: default_copy_feedback_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            example_ips: default_example_ips(),
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let config: Config = serde_yaml_ng::from_str(&contents)?;
            Ok(config)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Write the config to its on-disk location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        fs::write(&config_path, yaml)?;
        Ok(())
    }

    /// Platform path of the config file. `GEOLENS_CONFIG_DIR` overrides the
    /// directory, which the tests use to avoid touching the real one.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Platform config directory for this application.
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("GEOLENS_CONFIG_DIR") {
            return PathBuf::from(dir);
        }
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("geolens")
        } else {
            PathBuf::from(".geolens")
        }
    }

    /// Placeholder rotation interval as a [`Duration`].
    pub fn placeholder_interval(&self) -> Duration {
        Duration::from_millis(self.placeholder_interval_ms)
    }

    /// Copy confirmation window as a [`Duration`].
    pub fn copy_feedback_window(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
