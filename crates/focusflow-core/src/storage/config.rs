//! TOML-based planner configuration.
//!
//! Stores the scheduling policy (break length, day bounds, post-school
//! buffer, default school hours, default slot color) and an optional
//! RNG seed for reproducible timetables.
//!
//! Configuration is stored at `~/.config/focusflow/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::ClockTime;
use crate::error::{ConfigError, CoreError};
use crate::scheduler::{
    SchedulerConfig, DEFAULT_BREAK_MINUTES, DEFAULT_DAY_END, DEFAULT_DAY_START,
    DEFAULT_POST_SCHOOL_BUFFER_MINUTES, DEFAULT_SCHOOL_END, DEFAULT_SCHOOL_START,
    DEFAULT_SLOT_COLOR,
};

/// `[scheduler]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSection {
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_day_start")]
    pub day_start: ClockTime,
    #[serde(default = "default_day_end")]
    pub day_end: ClockTime,
    #[serde(default = "default_post_school_buffer")]
    pub post_school_buffer_minutes: u32,
    #[serde(default = "default_school_start")]
    pub default_school_start: ClockTime,
    #[serde(default = "default_school_end")]
    pub default_school_end: ClockTime,
    #[serde(default = "default_color")]
    pub default_color: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusflow/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fixed RNG seed. When unset every generation draws fresh entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

// Default functions
fn default_break_minutes() -> u32 {
    DEFAULT_BREAK_MINUTES
}
fn default_day_start() -> ClockTime {
    DEFAULT_DAY_START
}
fn default_day_end() -> ClockTime {
    DEFAULT_DAY_END
}
fn default_post_school_buffer() -> u32 {
    DEFAULT_POST_SCHOOL_BUFFER_MINUTES
}
fn default_school_start() -> ClockTime {
    DEFAULT_SCHOOL_START
}
fn default_school_end() -> ClockTime {
    DEFAULT_SCHOOL_END
}
fn default_color() -> String {
    DEFAULT_SLOT_COLOR.into()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            break_minutes: default_break_minutes(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            post_school_buffer_minutes: default_post_school_buffer(),
            default_school_start: default_school_start(),
            default_school_end: default_school_end(),
            default_color: default_color(),
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
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                // Optional keys are absent from the JSON form until set.
                let existing = match obj.get(part) {
                    Some(v) => v.clone(),
                    None if Self::is_optional_key(key) => serde_json::Value::Null,
                    None => return Err(unknown()),
                };

                let new_value = match existing {
                    _ if value == "null" && Self::is_optional_key(key) => serde_json::Value::Null,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                    // Unset optional keys and whole tables take a JSON literal.
                    _ => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn is_optional_key(key: &str) -> bool {
        key == "seed"
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Ok(Self::load_from(&path)?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        Ok(self.save_to(&Self::path()?)?)
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
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// `"null"` clears an optional key such as `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. `self` is left unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Every leaf key with its current value, in declaration order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = vec![(
            "seed".to_string(),
            self.seed.map_or_else(|| "null".to_string(), |s| s.to_string()),
        )];
        let s = &self.scheduler;
        let scheduler = [
            ("break_minutes", s.break_minutes.to_string()),
            ("day_start", s.day_start.to_string()),
            ("day_end", s.day_end.to_string()),
            ("post_school_buffer_minutes", s.post_school_buffer_minutes.to_string()),
            ("default_school_start", s.default_school_start.to_string()),
            ("default_school_end", s.default_school_end.to_string()),
            ("default_color", s.default_color.clone()),
        ];
        out.extend(scheduler.into_iter().map(|(k, v)| (format!("scheduler.{k}"), v)));
        out
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.scheduler;
        if s.day_start >= s.day_end {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.day_start".into(),
                message: format!("day_start ({}) must be before day_end ({})", s.day_start, s.day_end),
            });
        }
        if s.default_school_start >= s.default_school_end {
            return Err(ConfigError::InvalidValue {
                key: "scheduler.default_school_start".into(),
                message: format!(
                    "default_school_start ({}) must be before default_school_end ({})",
                    s.default_school_start, s.default_school_end
                ),
            });
        }
        Ok(())
    }

    /// Scheduling policy for [`crate::scheduler::StudyScheduler`].
    pub fn scheduler(&self) -> SchedulerConfig {
        let s = &self.scheduler;
        SchedulerConfig {
            break_minutes: s.break_minutes,
            day_start: s.day_start,
            day_end: s.day_end,
            post_school_buffer_minutes: s.post_school_buffer_minutes,
            default_school_start: s.default_school_start,
            default_school_end: s.default_school_end,
            default_color: s.default_color.clone(),
        }
    }
}
