// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer configuration.
//!
//! Supports both programmatic and file-based (JSON) configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Envelope property holding the type name (Full format).
pub const TYPE_KEY: &str = "type";
/// Envelope property holding the payload (Full format).
pub const VALUE_KEY: &str = "value";
/// Map entry property holding the key.
pub const MAP_KEY: &str = "key";
/// Map entry property holding the value.
pub const MAP_VALUE: &str = "value";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown format `{0}` (expected `full` or `short`)")]
    UnknownFormat(String),

    #[error("Unknown property policy `{0}` (expected `strict` or `skip`)")]
    UnknownPolicy(String),
}

/// Document layout produced and expected by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `{"type": <name>, "value": <payload>}`.
    #[default]
    Full,
    /// Bare payload.
    Short,
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "short" => Ok(Self::Short),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Short => f.write_str("short"),
        }
    }
}

/// What object deserialization does with a property naming no member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPropertyPolicy {
    /// Fail the deserialization.
    #[default]
    Strict,
    /// Ignore the property and its value.
    Skip,
}

impl FromStr for UnknownPropertyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "skip" => Ok(Self::Skip),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Serializer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
    /// Output/input layout.
    pub format: Format,

    /// Handling of unknown object properties on read.
    pub unknown_properties: UnknownPropertyPolicy,
}

impl SerializerConfig {
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_unknown_properties(mut self, policy: UnknownPropertyPolicy) -> Self {
        self.unknown_properties = policy;
        self
    }

    /// Parse configuration from JSON text; missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
