// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter and account field descriptions for module configuration.
//!
//! Schemas are descriptive only: they name the fields a configuration form
//! offers and the value shown when a field was never set. Values written into
//! a [`ModuleConfig`](crate::config::ModuleConfig) are not checked against them.

use crate::config::ParamValue;
use crate::node::NodeKind;
use serde::{Deserialize, Serialize};

/// Input style of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Number, optionally bounded
    Number {
        /// Lower bound
        min: Option<f64>,
        /// Upper bound
        max: Option<f64>,
    },
    /// One of a fixed set of options
    Choice(Vec<String>),
}

/// A single configurable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterField {
    /// Key in the configuration map
    pub key: String,
    /// Display label
    pub label: String,
    /// Input style
    pub kind: FieldKind,
    /// Value used when nothing is stored
    pub default: Option<ParamValue>,
    /// Hint shown in an empty input
    pub placeholder: Option<String>,
}

impl ParameterField {
    /// Create a text field
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Text,
            default: None,
            placeholder: None,
        }
    }

    /// Create an unbounded number field
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Number { min: None, max: None },
            ..Self::text(key, label)
        }
    }

    /// Create a choice field
    pub fn choice(key: impl Into<String>, label: impl Into<String>, options: &[&str]) -> Self {
        Self {
            kind: FieldKind::Choice(options.iter().map(|o| (*o).to_string()).collect()),
            ..Self::text(key, label)
        }
    }

    /// Bound a number field
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        if let FieldKind::Number { .. } = self.kind {
            self.kind = FieldKind::Number {
                min: Some(min),
                max: Some(max),
            };
        }
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the placeholder
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Parameter fields offered for a node kind
pub fn parameter_fields(kind: &NodeKind) -> Vec<ParameterField> {
    match kind {
        NodeKind::Token => vec![
            ParameterField::text("tokenName", "Token Name").with_placeholder("My Token"),
            ParameterField::text("tokenSymbol", "Token Symbol").with_placeholder("MTK"),
            ParameterField::choice("decimals", "Decimals", &["6", "8", "9"]).with_default(9i64),
            ParameterField::number("initialSupply", "Initial Supply").with_placeholder("1000000"),
        ],
        NodeKind::Nft => vec![
            ParameterField::text("collectionName", "Collection Name")
                .with_placeholder("My NFT Collection"),
            ParameterField::number("maxSupply", "Max Supply").with_placeholder("10000"),
            ParameterField::number("royalty", "Royalty (%)")
                .with_range(0.0, 100.0)
                .with_placeholder("5"),
        ],
        NodeKind::Custom(name) if name.eq_ignore_ascii_case("defi") => vec![
            ParameterField::choice("poolType", "Pool Type", &["liquidity", "staking", "lending"]),
            ParameterField::number("feeRate", "Fee Rate (%)").with_placeholder("0.3"),
        ],
        _ => vec![ParameterField::text("customParam", "Custom Parameter")
            .with_placeholder("Enter custom parameter")],
    }
}

/// Account fields offered for every node
pub fn account_fields() -> Vec<ParameterField> {
    vec![
        ParameterField::choice("authorityType", "Authority Type", &["signer", "program", "pda"])
            .with_default("signer"),
        ParameterField::choice("accountType", "Account Type", &["mutable", "readonly", "init"])
            .with_default("mutable"),
    ]
}

/// Find a field by key
pub fn find_field<'a>(fields: &'a [ParameterField], key: &str) -> Option<&'a ParameterField> {
    fields.iter().find(|f| f.key == key)
}
