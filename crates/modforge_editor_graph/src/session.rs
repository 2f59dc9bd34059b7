// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration editing session for a single node.
//!
//! A session decodes the node's stored configuration once, collects edits
//! locally and writes the whole configuration back on [`ConfigSession::save`].
//! Nothing reaches the graph before that.

use crate::config::{self, ModuleConfig, ParamValue};
use crate::graph::{CanvasGraph, GraphError};
use crate::node::{NodeId, NodeKind, NodeUpdate};
use crate::schema::{self, ParameterField};

/// In-progress edit of one node's configuration
#[derive(Debug, Clone)]
pub struct ConfigSession {
    node_id: NodeId,
    kind: NodeKind,
    config: ModuleConfig,
    connected: usize,
}

impl ConfigSession {
    /// Open a session on a node
    pub fn open(graph: &CanvasGraph, node_id: NodeId) -> Result<Self, GraphError> {
        let node = graph.node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(Self {
            node_id,
            kind: node.kind().clone(),
            config: config::decode(&node.config_blob),
            connected: graph.connections_for_node(node_id).count(),
        })
    }

    /// Node being configured
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Kind of the node being configured
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The configuration as edited so far
    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Number of connections touching the node when the session was opened
    pub fn connected_count(&self) -> usize {
        self.connected
    }

    /// Parameter fields offered for this node
    pub fn parameter_fields(&self) -> Vec<ParameterField> {
        schema::parameter_fields(&self.kind)
    }

    /// Set a parameter value. Returns `false` if the value can't be stored,
    /// such as a NaN or infinite float.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> bool {
        self.config.set_parameter(key, value.into())
    }

    /// Set an account field
    pub fn set_account_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.accounts.insert(key.into(), value.into());
    }

    /// Append a constraint. Blank text is ignored.
    pub fn append_constraint(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.config.constraints.push(text.to_string());
        }
    }

    /// Remove the constraint at `index`, if there is one
    pub fn remove_constraint(&mut self, index: usize) {
        if index < self.config.constraints.len() {
            self.config.constraints.remove(index);
        }
    }

    /// Replace the custom code
    pub fn set_custom_code(&mut self, code: impl Into<String>) {
        self.config.custom_code = code.into();
    }

    /// Stored parameter value, else the schema default
    pub fn parameter_or_default(&self, key: &str) -> Option<ParamValue> {
        self.config.parameters.get(key).cloned().or_else(|| {
            schema::find_field(&self.parameter_fields(), key).and_then(|f| f.default.clone())
        })
    }

    /// Stored account setting, else the schema default
    pub fn account_or_default(&self, key: &str) -> Option<String> {
        self.config.accounts.get(key).cloned().or_else(|| {
            schema::find_field(&schema::account_fields(), key)
                .and_then(|f| f.default.as_ref())
                .map(ToString::to_string)
        })
    }

    /// Summary written into the node's description on save
    pub fn summary(&self) -> String {
        format!("Configured {} module", self.kind)
    }

    /// Write the configuration back into the node
    pub fn save(self, graph: &mut CanvasGraph) -> Result<(), GraphError> {
        let update = NodeUpdate::default()
            .with_config_blob(self.config.encode())
            .with_description(self.summary());
        graph.update_node(self.node_id, update)?;
        tracing::debug!("Saved configuration for node {}", self.node_id);
        Ok(())
    }
}
