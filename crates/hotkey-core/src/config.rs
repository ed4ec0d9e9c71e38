//! Widget configuration and persistence.

use crate::binding::{BindingParseError, KeyBinding};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "HOTKEY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid binding {field}: {source}")]
    Binding {
        field: &'static str,
        #[source]
        source: BindingParseError,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Accelerator the widget reacts to.
    pub binding: String,
    /// Diagnostic message logged when the binding fires.
    pub message: String,
    /// Two presses closer than this are reported as a double press. 0 disables.
    pub double_press_window_ms: u64,
    /// Accelerator that ends the app's pump loop.
    pub quit_binding: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            binding: "Ctrl+C".into(),
            message: "CTRL+C has been pressed!".into(),
            double_press_window_ms: 1000,
            quit_binding: "Escape".into(),
        }
    }
}

impl WidgetConfig {
    pub fn key_binding(&self) -> ConfigResult<KeyBinding> {
        self.binding
            .parse()
            .map_err(|source| ConfigError::Binding { field: "binding", source })
    }

    pub fn quit_key_binding(&self) -> ConfigResult<KeyBinding> {
        self.quit_binding
            .parse()
            .map_err(|source| ConfigError::Binding { field: "quit_binding", source })
    }

    /// Check that both bindings parse.
    pub fn validate(&self) -> ConfigResult<()> {
        self.key_binding()?;
        self.quit_key_binding()?;
        Ok(())
    }
}

/// Get the app data directory for hotkey.
pub fn get_app_data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hotkey")
}

/// Config file path: `$HOTKEY_CONFIG` if set, else `<data dir>/hotkey/config.json`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_app_data_dir().join("config.json"),
    }
}

/// Load the config from its default location.
pub fn load_config() -> ConfigResult<WidgetConfig> {
    load_config_from(config_path())
}

/// Load and validate a config file. A missing file yields the defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> ConfigResult<WidgetConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(?path, "No config file, using defaults");
        return Ok(WidgetConfig::default());
    }

    let json = fs::read_to_string(path)?;
    let config: WidgetConfig = serde_json::from_str(&json)?;
    config.validate()?;

    info!(?path, binding = %config.binding, "Loaded config");
    Ok(config)
}

/// Write a config file, creating parent directories as needed.
pub fn save_config_to(path: impl AsRef<Path>, config: &WidgetConfig) -> ConfigResult<()> {
    let path = path.as_ref();
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyCode;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.key_binding().unwrap(), KeyBinding::ctrl(KeyCode::C));
        assert_eq!(
            config.quit_key_binding().unwrap(),
            KeyBinding::key_only(KeyCode::Escape)
        );
        assert_eq!(config.double_press_window_ms, 1000);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("nope.json")).unwrap();
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "binding": "Ctrl+Shift+X" }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.binding, "Ctrl+Shift+X");
        assert_eq!(config.message, WidgetConfig::default().message);
        assert_eq!(config.quit_binding, "Escape");
    }

    #[test]
    fn test_invalid_binding_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "quit_binding": "Ctrl+" }"#).unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Binding { field: "quit_binding", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = WidgetConfig {
            binding: "Alt+F4".into(),
            double_press_window_ms: 0,
            ..WidgetConfig::default()
        };

        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    // The only test touching CONFIG_PATH_ENV, so it cannot race another test.
    #[test]
    fn test_config_path_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let config = WidgetConfig {
            message: "from env".into(),
            ..WidgetConfig::default()
        };
        save_config_to(&path, &config).unwrap();

        std::env::set_var(CONFIG_PATH_ENV, &path);
        assert_eq!(config_path(), path);
        assert_eq!(load_config().unwrap(), config);

        std::env::set_var(CONFIG_PATH_ENV, "");
        assert_eq!(config_path(), get_app_data_dir().join("config.json"));

        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(config_path(), get_app_data_dir().join("config.json"));
    }
}
