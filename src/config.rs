//! Configuration handling for kiln.
//! This module holds the values substituted into templates, merges them over the
//! known defaults and parses them from JSON, YAML or `key=value` literals.

use crate::constants::defaults::{
    AUTHOR_EMAIL, AUTHOR_NAME, DEFAULT_LICENSE, DEFAULT_PORT, DOCKER_SUPPORT, LICENSE, PORT,
    PROJECT_DESCRIPTION, PROJECT_NAME, REPOSITORY_URL,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::fmt;
use std::path::Path;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Interprets a command-line literal.
    ///
    /// `true` and `false` become booleans, anything serde_json accepts as a number
    /// becomes a number and everything else is kept verbatim as a string.
    pub fn parse_literal(raw: &str) -> Self {
        match raw {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => match serde_json::from_str::<serde_json::Number>(raw) {
                Ok(number) => ConfigValue::Number(number),
                Err(_) => ConfigValue::String(raw.to_string()),
            },
        }
    }

    /// Converts a parsed JSON/YAML value, rejecting anything that is not a scalar.
    ///
    /// # Errors
    /// * `Error::ConfigError` for null, arrays and objects
    pub fn from_json(key: &str, value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(value) => Ok(ConfigValue::Bool(value)),
            serde_json::Value::Number(value) => Ok(ConfigValue::Number(value)),
            serde_json::Value::String(value) => Ok(ConfigValue::String(value)),
            other => Err(Error::ConfigError(format!(
                "unsupported value for '{key}': expected a string, number or boolean, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(value) => write!(f, "{value}"),
            // Integral floats print without a fractional part: 8080.0 is "8080".
            ConfigValue::Number(value) => match value.as_f64() {
                Some(float) if value.is_f64() => write!(f, "{float}"),
                _ => write!(f, "{value}"),
            },
            ConfigValue::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

/// Values supplied by the caller before defaults are applied.
pub type PartialConfig = IndexMap<String, ConfigValue>;

/// The known keys with their default values, in substitution order.
pub fn known_defaults() -> Vec<(&'static str, ConfigValue)> {
    vec![
        (PROJECT_NAME, "".into()),
        (PROJECT_DESCRIPTION, "".into()),
        (AUTHOR_NAME, "".into()),
        (AUTHOR_EMAIL, "".into()),
        (REPOSITORY_URL, "".into()),
        (LICENSE, DEFAULT_LICENSE.into()),
        (DOCKER_SUPPORT, false.into()),
        (PORT, DEFAULT_PORT.into()),
    ]
}

/// Configuration merged over the defaults. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    values: IndexMap<String, ConfigValue>,
}

impl Configuration {
    /// Merges `partial` over the known defaults.
    ///
    /// Known keys keep their default position even when overridden; unknown keys
    /// are appended in the order they were supplied.
    pub fn new(partial: PartialConfig) -> Self {
        let mut values: IndexMap<String, ConfigValue> = known_defaults()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        for (key, value) in partial {
            values.insert(key, value);
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A non-boolean `dockerSupport` counts as disabled.
    pub fn docker_support(&self) -> bool {
        self.get(DOCKER_SUPPORT).and_then(ConfigValue::as_bool).unwrap_or(false)
    }

    pub fn project_name(&self) -> String {
        self.get(PROJECT_NAME).map(ToString::to_string).unwrap_or_default()
    }

    /// Returns a non-empty string value, if any.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string).filter(|value| !value.is_empty())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(PartialConfig::new())
    }
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// Blank content yields no values.
///
/// # Errors
/// * `Error::YAMLParseError` if the content is neither a JSON nor a YAML mapping
/// * `Error::ConfigError` if a value is not a scalar
pub fn parse_config(content: &str) -> Result<PartialConfig> {
    if content.trim().is_empty() {
        return Ok(PartialConfig::new());
    }

    let raw_value: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            debug!("Configuration is not JSON ({e}), trying YAML");
            serde_yaml::from_str(content)?
        }
    };

    raw_value
        .into_iter()
        .map(|(key, value)| ConfigValue::from_json(&key, value).map(|value| (key, value)))
        .collect()
}

/// Loads configuration values from a JSON or YAML file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<PartialConfig> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(config_path)
        .map_err(|source| Error::FileError { path: config_path.to_path_buf(), source })?;
    parse_config(&content)
}

/// Parses a `key=value` assignment given on the command line.
pub fn parse_assignment(raw: &str) -> Result<(String, ConfigValue)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), ConfigValue::parse_literal(value)))
        }
        _ => Err(Error::ConfigError(format!("expected KEY=VALUE, got '{raw}'"))),
    }
}
