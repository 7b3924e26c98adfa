use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schedule::{parse_time_of_day, Weekday};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the activity-type directory
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Seconds a fetched activity list stays fresh
    #[serde(default = "default_options_ttl_secs")]
    pub options_ttl_secs: i64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub professional_id: Option<i64>,
    #[serde(default)]
    pub professional_name: Option<String>,
    /// First grid row, HH:MM
    #[serde(default = "default_day_start")]
    pub day_start: String,
    /// End of the last grid row, HH:MM
    #[serde(default = "default_day_end")]
    pub day_end: String,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default)]
    pub show_weekend: bool,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_options_ttl_secs() -> i64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_day_start() -> String {
    "08:00".to_string()
}

fn default_day_end() -> String {
    "18:00".to_string()
}

fn default_slot_minutes() -> u32 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            options_ttl_secs: default_options_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            professional_id: None,
            professional_name: None,
            day_start: default_day_start(),
            day_end: default_day_end(),
            slot_minutes: default_slot_minutes(),
            show_weekend: false,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "agenda", "agenda")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Load from the platform config directory, falling back to defaults when the
    /// file does not exist yet
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let config_data = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("failed to create config directory: {}", e))
            })?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("failed to serialize config: {}", e)))?;

        fs::write(path, config_data)
            .map_err(|e| ConfigError::SaveFailed(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Reject values the grid cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: String| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        };

        let start = parse_time_of_day(&self.day_start)
            .map_err(|_| invalid("day_start", self.day_start.clone()))?;
        let end = parse_time_of_day(&self.day_end)
            .map_err(|_| invalid("day_end", self.day_end.clone()))?;
        if end <= start {
            return Err(invalid("day_end", self.day_end.clone()));
        }
        if self.slot_minutes == 0 || self.slot_minutes > 24 * 60 {
            return Err(invalid("slot_minutes", self.slot_minutes.to_string()));
        }
        if self.options_ttl_secs < 0 {
            return Err(invalid("options_ttl_secs", self.options_ttl_secs.to_string()));
        }
        if let Some(id) = self.professional_id {
            if id <= 0 {
                return Err(invalid("professional_id", id.to_string()));
            }
        }
        Ok(())
    }

    /// Weekdays shown as grid columns
    pub fn weekdays(&self) -> Vec<Weekday> {
        if self.show_weekend {
            Weekday::all().to_vec()
        } else {
            Weekday::working_days().to_vec()
        }
    }
}
