use std::path::{Path, PathBuf};
use std::fs;

use tracing::info;

use crate::error::ConfigError;
use crate::models::LauncherConfig;

const APP_DIR: &str = "kenji-launcher";

pub fn get_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_DIR);

    // Create directory if it doesn't exist
    let _ = fs::create_dir_all(&config_dir);

    config_dir.join("config.json")
}

/// Holds the durable grant table and stored shortcut icons.
pub fn get_data_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join(APP_DIR);

    let _ = fs::create_dir_all(&data_dir);

    data_dir
}

pub fn save_config(config: &LauncherConfig, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the config, filling in fields that older files do not have.
pub fn load_config(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str::<LauncherConfig>(&json) {
        Ok(config) => Ok(config),
        Err(_) => {
            let mut value: serde_json::Value = serde_json::from_str(&json)?;
            let defaults = serde_json::to_value(LauncherConfig::default())?;
            merge_missing(&mut value, &defaults, "");
            Ok(serde_json::from_value(value)?)
        }
    }
}

fn merge_missing(value: &mut serde_json::Value, defaults: &serde_json::Value, prefix: &str) {
    let (serde_json::Value::Object(map), serde_json::Value::Object(default_map)) = (value, defaults) else {
        return;
    };

    for (key, default) in default_map {
        let field = format!("{}{}", prefix, key);
        match map.get_mut(key) {
            Some(existing) => merge_missing(existing, default, &format!("{}.", field)),
            None => {
                map.insert(key.clone(), default.clone());
                info!("Migrated config: Added {} field", field);
            }
        }
    }
}
