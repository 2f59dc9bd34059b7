// SPDX-License-Identifier: MIT OR Apache-2.0
//! Module template catalog.
//!
//! The catalog is an immutable value built once from the built-in templates
//! and a caller-supplied custom set. It is handed to whoever creates nodes;
//! there is no global registry.

use crate::config::ModuleConfig;
use crate::node::NodeKind;
use crate::schema::ParameterField;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A kind of module that can be placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTemplate {
    /// Unique template identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Library category (e.g. "Core", "Token", "DeFi")
    pub category: String,
    /// What the module does
    pub description: String,
    /// Parameters the module exposes
    pub parameter_schema: Vec<ParameterField>,
    /// Whether the template ships with the editor
    pub is_built_in: bool,
}

impl ModuleTemplate {
    /// Create a user-defined template
    pub fn custom(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            parameter_schema: Vec::new(),
            is_built_in: false,
        }
    }

    /// Add a parameter to the schema
    pub fn with_parameter(mut self, field: ParameterField) -> Self {
        self.parameter_schema.push(field);
        self
    }

    /// Node kind used when this template is added to the canvas.
    ///
    /// Core modules become instructions, token and NFT modules become
    /// accounts, everything else is an instruction.
    pub fn node_kind(&self) -> NodeKind {
        match self.category.to_ascii_lowercase().as_str() {
            "token" | "nft" => NodeKind::Account,
            _ => NodeKind::Instruction,
        }
    }

    /// Configuration seeded from the schema defaults
    pub fn default_config(&self) -> ModuleConfig {
        let mut config = ModuleConfig::default();
        for field in &self.parameter_schema {
            if let Some(value) = &field.default {
                if !config.set_parameter(field.key.clone(), value.clone()) {
                    tracing::warn!(
                        "Template {} has an unstorable default for {}",
                        self.id,
                        field.key
                    );
                }
            }
        }
        config
    }

    fn matches(&self, term: &str) -> bool {
        term.is_empty()
            || self.name.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
    }
}

/// Read-only registry of module templates, built-ins first
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    templates: IndexMap<String, ModuleTemplate>,
}

impl ModuleCatalog {
    /// Built-in templates merged with `custom`.
    ///
    /// Custom templates are marked as not built-in. A custom template whose ID
    /// collides with an earlier entry is skipped.
    pub fn new(custom: impl IntoIterator<Item = ModuleTemplate>) -> Self {
        let mut catalog = Self::from_templates(crate::templates::builtin_templates());
        for mut template in custom {
            template.is_built_in = false;
            if catalog.templates.contains_key(&template.id) {
                tracing::warn!("Skipping custom module with duplicate id: {}", template.id);
                continue;
            }
            catalog.templates.insert(template.id.clone(), template);
        }
        catalog
    }

    /// Catalog holding exactly `templates`, in order
    pub fn from_templates(templates: impl IntoIterator<Item = ModuleTemplate>) -> Self {
        let templates = templates
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        Self { templates }
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> Option<&ModuleTemplate> {
        self.templates.get(id)
    }

    /// Get all templates
    pub fn templates(&self) -> impl Iterator<Item = &ModuleTemplate> {
        self.templates.values()
    }

    /// Get user-defined templates
    pub fn custom_templates(&self) -> impl Iterator<Item = &ModuleTemplate> {
        self.templates.values().filter(|t| !t.is_built_in)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Distinct categories, in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for template in self.templates.values() {
            if !categories.contains(&template.category.as_str()) {
                categories.push(&template.category);
            }
        }
        categories
    }

    /// Templates whose name or description contains `term` (case-insensitive)
    /// and whose category matches, if one is given
    pub fn search<'a>(
        &'a self,
        term: &str,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ModuleTemplate> + 'a {
        let term = term.trim().to_lowercase();
        self.templates.values().filter(move |t| {
            t.matches(&term) && category.map_or(true, |c| t.category.eq_ignore_ascii_case(c))
        })
    }
}
