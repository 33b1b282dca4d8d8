//! TOML-based application configuration.
//!
//! Stores:
//! - AI service settings (model, API key variable, endpoint, timeout)
//! - Fasting defaults
//! - Log verbosity
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::fasting::{DEFAULT_GOAL_HOURS, MAX_GOAL_HOURS};

/// Generative-AI service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Fasting timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingConfig {
    /// Goal length given to new profiles.
    #[serde(default = "default_goal_hours")]
    pub default_goal_hours: f64,
}

/// Logging configuration. `RUST_LOG` takes precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub fasting: FastingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_goal_hours() -> f64 {
    DEFAULT_GOAL_HOURS
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FastingConfig {
    fn default() -> Self {
        Self {
            default_goal_hours: default_goal_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AiConfig {
    /// The API key from the configured environment variable, if set and
    /// non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    fn get_json_value_by_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |current, part| current.get(part))
    }

    fn set_json_value_by_path(root: &mut Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            Value::Bool(_) => Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    Value::Number(n.into())
                } else {
                    value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                }
            }
            Value::Object(_) | Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Self::parse(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Load from disk, returning the defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or a value is out of
    /// range.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Rejects an out-of-range goal, a zero timeout or an unparsable base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.fasting.default_goal_hours;
        if !(hours > 0.0 && hours <= MAX_GOAL_HOURS) {
            return Err(ConfigError::InvalidValue {
                key: "fasting.default_goal_hours".into(),
                message: format!("must be in (0, {MAX_GOAL_HOURS}]"),
            });
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ai.timeout_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        url::Url::parse(&self.ai.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "ai.base_url".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. On error `self` is unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::parse(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.ai.model, "gemini-2.5-flash");
        assert_eq!(parsed.fasting.default_goal_hours, 16.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::parse("[ai]\nmodel = \"gemini-1.5-pro\"\n").unwrap();
        assert_eq!(cfg.ai.model, "gemini-1.5-pro");
        assert_eq!(cfg.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("ai.timeout_secs").as_deref(), Some("30"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("warn"));
        assert!(cfg.get("ai.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("ai.model", "gemini-2.0-flash-exp").unwrap();
        cfg.apply("fasting.default_goal_hours", "18").unwrap();
        cfg.apply("ai.timeout_secs", "10").unwrap();
        assert_eq!(cfg.ai.model, "gemini-2.0-flash-exp");
        assert_eq!(cfg.fasting.default_goal_hours, 18.0);
        assert_eq!(cfg.ai.timeout_secs, 10);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.apply("ai.nonexistent_key", "value").is_err());
        assert!(cfg.apply("nothing", "value").is_err());
    }

    #[test]
    fn apply_rejects_invalid_values_without_change() {
        let mut cfg = Config::default();
        assert!(cfg.apply("ai.timeout_secs", "soon").is_err());
        assert!(cfg.apply("fasting.default_goal_hours", "0").is_err());
        assert!(cfg.apply("ai.base_url", "not a url").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn api_key_reads_configured_variable() {
        let mut cfg = Config::default();
        cfg.ai.api_key_env = "NUTRILOG_TEST_KEY_THAT_IS_NEVER_SET".into();
        assert!(cfg.ai.api_key().is_none());
    }
}
