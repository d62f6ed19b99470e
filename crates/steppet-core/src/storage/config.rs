//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Daily step goal used for a fresh profile
//! - Subscription tier used for a fresh profile
//! - History retention window
//! - Celebration toggles for the host UI
//!
//! Configuration is stored at `~/.config/steppet/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::credits::SubscriptionTier;
use crate::error::ConfigError;
use crate::goal::DEFAULT_STEP_GOAL;
use crate::history::{DEFAULT_RETENTION_DAYS, MAX_RETENTION_DAYS};
use crate::progression::EngineSettings;

/// Step goal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_steps")]
    pub daily_steps: u32,
}

/// Subscription configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub tier: SubscriptionTier,
}

/// History configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Finalized days older than this are dropped from the archive.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

/// Which events the host should celebrate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrationsConfig {
    #[serde(default = "default_true")]
    pub goal_celebrations: bool,
    #[serde(default = "default_true")]
    pub streak_milestones: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/steppet/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub subscription: SubscriptionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub celebrations: CelebrationsConfig,
}

fn default_daily_steps() -> u32 {
    DEFAULT_STEP_GOAL
}
fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}
fn default_true() -> bool {
    true
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_steps: default_daily_steps(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

impl Default for CelebrationsConfig {
    fn default() -> Self {
        Self {
            goal_celebrations: true,
            streak_milestones: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.to_lowercase()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        data_dir()
            .map(|dir| dir.join("config.toml"))
            .map_err(|e| ConfigError::DataDir(e.to_string()))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every leaf key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Update a value by dot-separated key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is rejected.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.goal.daily_steps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "goal.daily_steps".into(),
                message: "must be positive".into(),
            });
        }
        if !(1..=MAX_RETENTION_DAYS).contains(&self.history.retention_days) {
            return Err(ConfigError::InvalidValue {
                key: "history.retention_days".into(),
                message: format!("must be between 1 and {MAX_RETENTION_DAYS}"),
            });
        }
        Ok(())
    }

    /// Seed values the engine uses when no snapshot exists.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            initial_goal: self.goal.daily_steps,
            initial_tier: self.subscription.tier,
            retention_days: self.history.retention_days,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.goal.daily_steps, 10_000);
        assert_eq!(parsed.subscription.tier, SubscriptionTier::Base);
        assert!(parsed.celebrations.streak_milestones);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[goal]\ndaily_steps = 6000\n").unwrap();
        assert_eq!(parsed.goal.daily_steps, 6000);
        assert_eq!(parsed.history.retention_days, 365);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("goal.daily_steps").as_deref(), Some("10000"));
        assert_eq!(cfg.get("subscription.tier").as_deref(), Some("base"));
        assert!(cfg.get("goal.missing_key").is_none());
        assert!(cfg.get("goal").is_none());
    }

    #[test]
    fn apply_updates_number_bool_and_tier() {
        let mut cfg = Config::default();
        cfg.apply("goal.daily_steps", "8000").unwrap();
        cfg.apply("celebrations.goal_celebrations", "false").unwrap();
        cfg.apply("subscription.tier", "Premium").unwrap();
        assert_eq!(cfg.goal.daily_steps, 8000);
        assert!(!cfg.celebrations.goal_celebrations);
        assert_eq!(cfg.subscription.tier, SubscriptionTier::Premium);
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("goal.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("goal.daily_steps", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.apply("goal.daily_steps", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("subscription.tier", "gold").is_err());
        assert_eq!(cfg.goal.daily_steps, 10_000);
    }

    #[test]
    fn apply_bounds_retention_window() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("history.retention_days", "100000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("history.retention_days", "0").is_err());
        assert_eq!(cfg.history.retention_days, 365);
        cfg.apply("history.retention_days", "36500").unwrap();
        assert_eq!(cfg.history.retention_days, 36_500);
    }

    #[test]
    fn entries_lists_every_leaf() {
        let keys: Vec<String> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"goal.daily_steps".to_string()));
        assert!(keys.contains(&"history.retention_days".to_string()));
        assert!(keys.contains(&"celebrations.streak_milestones".to_string()));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.goal.daily_steps, 10_000);

        let mut cfg = cfg;
        cfg.apply("goal.daily_steps", "12000").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().goal.daily_steps, 12_000);
    }

    #[test]
    fn load_from_rejects_zero_goal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[goal]\ndaily_steps = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn engine_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.apply("subscription.tier", "premium").unwrap();
        let settings = cfg.engine_settings();
        assert_eq!(settings.initial_goal, 10_000);
        assert_eq!(settings.initial_tier, SubscriptionTier::Premium);
        assert_eq!(settings.retention_days, 365);
    }
}
