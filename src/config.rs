//! # Configuration Module
//!
//! Settings for request validation and logging, loaded from a YAML file, from
//! environment variables, or both.
//!
//! The core functions take a [`ValidationConfig`] explicitly and never read the
//! environment themselves; this module is the application-side convenience that
//! produces one.
//!
//! ## Environment Variables
//!
//! | Variable | Field | Values |
//! |---|---|---|
//! | `TYPEDROUTE_UNKNOWN_FIELDS` | `validation.unknown_fields` | `reject` (default), `allow` |
//! | `TYPEDROUTE_MAX_BODY_BYTES` | `validation.max_body_bytes` | decimal (`1048576`) or hex (`0x100000`) |
//! | `TYPEDROUTE_VALIDATE_RESPONSES` | `validation.validate_responses` | `true`/`false`/`1`/`0` |
//! | `TYPEDROUTE_LOG_LEVEL` | `logging.level` | `trace`..`error`, default `info` |
//! | `TYPEDROUTE_LOG_FORMAT` | `logging.format` | `pretty` (default), `json` |
//!
//! Unparseable values are ignored and the previous value is kept.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use typedroute::config::Config;
//!
//! let config = Config::from_yaml_file("typedroute.yaml")?.apply_env();
//! println!("max body: {} bytes", config.validation.max_body_bytes);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ```yaml
//! validation:
//!   unknown_fields: reject
//!   max_body_bytes: 0x100000   # strings are accepted too
//!   validate_responses: true
//! logging:
//!   level: debug
//!   format: json
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::path::Path;

/// Default request body limit: 1 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 0x10_0000;

/// Treatment of object members a schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Each undeclared member is a validation error
    #[default]
    Reject,
    /// Undeclared members pass through unchanged
    Allow,
}

impl UnknownFieldPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Some(Self::Reject),
            "allow" | "passthrough" | "pass-through" => Some(Self::Allow),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Settings consumed by the validation pipeline and the response builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Policy for undeclared members in query, cookie and body objects
    pub unknown_fields: UnknownFieldPolicy,
    /// Largest accepted request body in bytes
    #[serde(deserialize_with = "deserialize_size")]
    pub max_body_bytes: usize,
    /// Check response payloads against their declared schemas
    pub validate_responses: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            validate_responses: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from a YAML file. Missing sections and fields take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("invalid typedroute configuration")
    }

    /// Defaults overlaid with `TYPEDROUTE_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Overlay `TYPEDROUTE_*` environment variables on this configuration
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(policy) = lookup("TYPEDROUTE_UNKNOWN_FIELDS")
            .as_deref()
            .and_then(UnknownFieldPolicy::parse)
        {
            self.validation.unknown_fields = policy;
        }
        if let Some(size) = lookup("TYPEDROUTE_MAX_BODY_BYTES")
            .as_deref()
            .and_then(parse_size)
        {
            self.validation.max_body_bytes = size;
        }
        if let Some(flag) = lookup("TYPEDROUTE_VALIDATE_RESPONSES")
            .as_deref()
            .and_then(parse_flag)
        {
            self.validation.validate_responses = flag;
        }
        if let Some(level) = lookup("TYPEDROUTE_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }
        if let Some(format) = lookup("TYPEDROUTE_LOG_FORMAT")
            .as_deref()
            .and_then(LogFormat::parse)
        {
            self.logging.format = format;
        }
        self
    }
}

/// Parse a byte size in decimal or `0x` hexadecimal
fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(usize),
        Text(String),
    }

    match Size::deserialize(deserializer)? {
        Size::Number(n) => Ok(n),
        Size::Text(s) => parse_size(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid byte size '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.unknown_fields, UnknownFieldPolicy::Reject);
        assert_eq!(config.validation.max_body_bytes, 1024 * 1024);
        assert!(config.validation.validate_responses);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides_accept_hex_and_decimal() {
        let config = Config::default().apply_vars(vars(&[
            ("TYPEDROUTE_MAX_BODY_BYTES", "0x4000"),
            ("TYPEDROUTE_UNKNOWN_FIELDS", "allow"),
            ("TYPEDROUTE_VALIDATE_RESPONSES", "0"),
            ("TYPEDROUTE_LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.validation.max_body_bytes, 0x4000);
        assert_eq!(config.validation.unknown_fields, UnknownFieldPolicy::Allow);
        assert!(!config.validation.validate_responses);
        assert_eq!(config.logging.format, LogFormat::Json);

        let config = Config::default().apply_vars(vars(&[("TYPEDROUTE_MAX_BODY_BYTES", "2048")]));
        assert_eq!(config.validation.max_body_bytes, 2048);
    }

    #[test]
    fn test_invalid_env_values_keep_previous() {
        let config = Config::default().apply_vars(vars(&[
            ("TYPEDROUTE_MAX_BODY_BYTES", "lots"),
            ("TYPEDROUTE_UNKNOWN_FIELDS", "maybe"),
        ]));
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_yaml_partial_sections() {
        let config = Config::from_yaml_str("validation:\n  max_body_bytes: \"0x800\"\n")
            .expect("valid yaml");
        assert_eq!(config.validation.max_body_bytes, 0x800);
        assert!(config.validation.validate_responses);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_yaml_rejects_bad_size() {
        assert!(Config::from_yaml_str("validation:\n  max_body_bytes: huge\n").is_err());
    }
}
