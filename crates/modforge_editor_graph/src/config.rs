// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node module configuration and its blob codec.
//!
//! A node keeps its [`ModuleConfig`] as an opaque string. The blob is a pretty
//! printed JSON object with sorted keys, so it diffs cleanly. Decoding is
//! best-effort: a blob that fails to parse yields the default configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value of a module parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Free text
    Text(String),
}

impl ParamValue {
    /// Check whether the value survives a trip through the blob.
    ///
    /// Non-finite floats have no JSON form and are written as `null`.
    pub fn is_storable(&self) -> bool {
        match self {
            Self::Float(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Decoded configuration of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleConfig {
    /// Parameter values by name
    #[serde(deserialize_with = "deserialize_parameters")]
    pub parameters: BTreeMap<String, ParamValue>,
    /// Authority/mutability setting by account role
    pub accounts: BTreeMap<String, String>,
    /// Constraint descriptions, in order
    pub constraints: Vec<String>,
    /// Code fragment attached to the node
    pub custom_code: String,
}

impl ModuleConfig {
    /// Check whether nothing has been configured
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
            && self.accounts.is_empty()
            && self.constraints.is_empty()
            && self.custom_code.is_empty()
    }

    /// Set a parameter. Values that can't be stored are refused.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: ParamValue) -> bool {
        let key = key.into();
        if !value.is_storable() {
            tracing::debug!("Refusing unstorable value for parameter {key}: {value}");
            return false;
        }
        self.parameters.insert(key, value);
        true
    }

    /// Serialize to a blob
    pub fn encode(&self) -> String {
        encode(self)
    }
}

/// Parameters with `null` values are dropped instead of failing the whole blob
fn deserialize_parameters<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, ParamValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<ParamValue>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            if value.is_none() {
                tracing::warn!("Dropping parameter {key} with no value");
            }
            value.map(|value| (key, value))
        })
        .collect())
}

/// Why a blob could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The blob holds nothing
    #[error("Configuration blob is empty")]
    Empty,

    /// The blob is not a configuration object
    #[error("Malformed configuration blob: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize a configuration deterministically
pub fn encode(config: &ModuleConfig) -> String {
    // Maps are BTreeMaps and every value is a JSON scalar, so this cannot fail.
    serde_json::to_string_pretty(config).unwrap_or_default()
}

/// Parse a blob, reporting why it failed
pub fn try_decode(blob: &str) -> Result<ModuleConfig, ConfigError> {
    if blob.trim().is_empty() {
        return Err(ConfigError::Empty);
    }
    Ok(serde_json::from_str(blob)?)
}

/// Parse a blob, falling back to the default configuration on failure
pub fn decode(blob: &str) -> ModuleConfig {
    try_decode(blob).unwrap_or_else(|err| {
        match err {
            ConfigError::Empty => tracing::debug!("No stored configuration, using defaults"),
            ConfigError::Malformed(_) => {
                tracing::warn!("Discarding unreadable configuration, using defaults: {err}");
            }
        }
        ModuleConfig::default()
    })
}
