//! Optional `map_marker.json` in the working directory. Every field has a
//! default, so the file may be partial or absent.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "map_marker.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map_path: PathBuf,
    pub markers_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from("map.jpeg"),
            markers_path: PathBuf::from("markers.txt"),
            window_width: 1920.0,
            window_height: 1080.0,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => {
                log::info!("Using configuration from {}", path.display());
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("Ignoring configuration, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).with_context(|| format!("Failed to read {}", path.display())),
        };
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::AppConfig;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("map_marker.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.markers_path, PathBuf::from("markers.txt"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_marker.json");
        std::fs::write(&path, r#"{ "map_path": "world.png", "window_width": 1280 }"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.map_path, PathBuf::from("world.png"));
        assert_eq!(config.window_width, 1280.0);
        assert_eq!(config.window_height, 1080.0);
        assert_eq!(config.markers_path, PathBuf::from("markers.txt"));
    }

    #[test]
    fn invalid_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_marker.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
