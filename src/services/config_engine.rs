// QRDesk Config Engine
// Loads and saves the process configuration (origin, scan pacing, decoder policies).
// The config is stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppConfig;

/// Trait defining the config engine interface.
pub trait ConfigEngineTrait {
    fn load(&mut self) -> Result<AppConfig, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_config(&self) -> &AppConfig;
    fn set_config(&mut self, config: AppConfig) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Config engine that persists [`AppConfig`] as JSON on disk.
pub struct ConfigEngine {
    config_path: String,
    config: AppConfig,
}

impl ConfigEngine {
    /// Creates a new ConfigEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `config.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("config.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            config: AppConfig::default(),
        }
    }
}

impl ConfigEngineTrait for ConfigEngine {
    /// Loads the config file.
    ///
    /// A missing file yields defaults. Fields absent from the file take their
    /// default values; a file that is not valid JSON is an error.
    fn load(&mut self) -> Result<AppConfig, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            log::debug!("no config at {}, using defaults", self.config_path);
            self.config = AppConfig::default();
            return Ok(self.config.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            SettingsError::Serialization(format!("Failed to parse config file: {}", e))
        })?;

        self.config = config;
        Ok(self.config.clone())
    }

    /// Writes the current config, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            SettingsError::Serialization(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the config and persists it.
    fn set_config(&mut self, config: AppConfig) -> Result<(), SettingsError> {
        if config.max_scan_frames == 0 {
            return Err(SettingsError::InvalidValue(
                "max_scan_frames must be at least 1".to_string(),
            ));
        }
        self.config = config;
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
