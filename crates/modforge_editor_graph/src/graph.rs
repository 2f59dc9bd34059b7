// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas graph store containing nodes and connections.

use crate::catalog::ModuleTemplate;
use crate::compatibility;
use crate::connection::{Connection, ConnectionId, ConnectionType};
use crate::node::{clamp_position, CanvasNode, NodeId, NodeKind, NodeUpdate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The canvas graph: single source of truth for nodes and connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasGraph {
    /// Graph name
    pub name: String,
    /// Nodes on the canvas
    nodes: IndexMap<NodeId, CanvasNode>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
    /// Bumped on every mutation
    #[serde(skip)]
    revision: u64,
}

impl CanvasGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            revision: 0,
        }
    }

    /// Add a node and return its ID.
    ///
    /// With a template, the node takes the template's name (unless
    /// `initial_name` is non-blank), description and default parameters.
    /// Without one it gets the built-in defaults for `kind`.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        initial_name: &str,
        position: [f32; 2],
        template: Option<&ModuleTemplate>,
    ) -> NodeId {
        let initial_name = initial_name.trim();
        let name = match (initial_name.is_empty(), template) {
            (false, _) => initial_name.to_string(),
            (true, Some(template)) => template.name.clone(),
            (true, None) => kind.default_name(),
        };

        let mut node = CanvasNode::new(kind, name).with_position(position[0], position[1]);
        if let Some(template) = template {
            node.template = Some(template.id.clone());
            if !template.description.is_empty() {
                node.description = Some(template.description.clone());
            }
            let config = template.default_config();
            if !config.is_empty() {
                node.config_blob = config.encode();
            }
        }

        let id = node.id;
        tracing::debug!("Added {} node {id} ({})", node.kind(), node.name);
        self.nodes.insert(id, node);
        self.touch();
        id
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<CanvasNode> {
        let node = self.nodes.shift_remove(&node_id)?;
        let before = self.connections.len();
        self.connections.retain(|_, c| !c.involves_node(node_id));
        tracing::debug!(
            "Removed node {node_id} and {} connection(s)",
            before - self.connections.len()
        );
        self.touch();
        Some(node)
    }

    /// Rename a node. Blank names are ignored; the stored name is trimmed.
    ///
    /// Returns whether the node was renamed.
    pub fn rename_node(&mut self, node_id: NodeId, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return false;
        };
        node.name = new_name.to_string();
        self.touch();
        true
    }

    /// Merge `update` into a node
    pub fn update_node(&mut self, node_id: NodeId, update: NodeUpdate) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        update.apply(node);
        self.touch();
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&CanvasNode> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Topmost node containing a canvas point
    pub fn node_at(&self, point: [f32; 2]) -> Option<NodeId> {
        self.nodes
            .values()
            .rev()
            .find(|n| n.contains(point))
            .map(|n| n.id)
    }

    /// Link two nodes with a typed connection.
    ///
    /// Both endpoints must exist and the compatibility rules must accept the
    /// link; otherwise the graph is left unchanged.
    pub fn add_connection(
        &mut self,
        source: NodeId,
        target: NodeId,
        connection_type: ConnectionType,
    ) -> Result<ConnectionId, GraphError> {
        let source_node = self.nodes.get(&source).ok_or(GraphError::NodeNotFound(source))?;
        let target_node = self.nodes.get(&target).ok_or(GraphError::NodeNotFound(target))?;

        if !compatibility::accepts_link(source_node.kind(), connection_type, target_node.kind()) {
            return Err(GraphError::IncompatibleConnection {
                source_kind: source_node.kind().clone(),
                connection_type,
                target_kind: target_node.kind().clone(),
            });
        }

        let connection = Connection::new(source, target, connection_type);
        let id = connection.id;
        tracing::debug!("Connected {source} -> {target} ({connection_type})");
        self.connections.insert(id, connection);
        self.touch();
        Ok(id)
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let removed = self.connections.shift_remove(&connection_id)?;
        self.touch();
        Some(removed)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Drop connections whose endpoints are missing.
    ///
    /// A graph built through this API never has any; graphs read from disk
    /// may. Returns the number of connections removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.connections.len();
        let nodes = &self.nodes;
        self.connections
            .retain(|_, c| nodes.contains_key(&c.source) && nodes.contains_key(&c.target));
        let removed = before - self.connections.len();
        if removed > 0 {
            tracing::warn!("Dropped {removed} dangling connection(s)");
            self.touch();
        }
        removed
    }

    /// Repair a graph read from disk so every node invariant holds again.
    ///
    /// Map keys are realigned with the IDs they store, negative or NaN
    /// positions are clamped, unusable sizes fall back to the kind's default
    /// and dangling connections are dropped. Returns the number of repairs.
    pub fn normalize(&mut self) -> usize {
        let mut repaired = 0;

        for (key, mut node) in std::mem::take(&mut self.nodes) {
            if key != node.id {
                tracing::warn!("Node stored under {key} has ID {}", node.id);
                repaired += 1;
            }
            let position = clamp_position(node.position);
            if position != node.position {
                node.position = position;
                repaired += 1;
            }
            if !node.size.iter().all(|s| s.is_finite() && *s > 0.0) {
                tracing::warn!("Node {} has unusable size {:?}", node.id, node.size);
                node.size = node.kind().default_size();
                repaired += 1;
            }
            if let Some(duplicate) = self.nodes.insert(node.id, node) {
                tracing::warn!("Dropped duplicate node {}", duplicate.id);
                repaired += 1;
            }
        }

        for (key, connection) in std::mem::take(&mut self.connections) {
            if key != connection.id {
                tracing::warn!("Connection stored under {key} has ID {}", connection.id);
                repaired += 1;
            }
            if self.connections.insert(connection.id, connection).is_some() {
                repaired += 1;
            }
        }

        repaired += self.prune_dangling();
        if repaired > 0 {
            self.touch();
        }
        repaired
    }

    /// Replace the whole graph content, e.g. from an undo snapshot.
    ///
    /// The revision keeps counting up from the current value.
    pub fn restore(&mut self, snapshot: CanvasGraph) {
        let revision = self.revision;
        *self = snapshot;
        self.revision = revision;
        self.prune_dangling();
        self.touch();
    }

    /// Mutation counter. Derived views computed at an older revision are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for CanvasGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error from a graph operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The compatibility rules reject the link
    #[error("Incompatible connection: {connection_type} link from {source_kind} to {target_kind}")]
    IncompatibleConnection {
        /// Kind of the source node
        source_kind: NodeKind,
        /// Declared connection type
        connection_type: ConnectionType,
        /// Kind of the target node
        target_kind: NodeKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModuleCatalog;
    use crate::config::{self, ParamValue};

    fn two_nodes() -> (CanvasGraph, NodeId, NodeId) {
        let mut graph = CanvasGraph::default();
        let a = graph.add_node(NodeKind::Token, "A", [100.0, 100.0], None);
        let b = graph.add_node(NodeKind::Instruction, "B", [300.0, 100.0], None);
        (graph, a, b)
    }

    #[test]
    fn test_add_node_defaults() {
        let mut graph = CanvasGraph::default();
        let id = graph.add_node(NodeKind::Start, "  ", [-10.0, 5.0], None);
        let node = graph.node(id).unwrap();
        assert_eq!(node.name, "Program Start");
        assert_eq!(node.position, [0.0, 5.0]);
        assert_eq!(node.size, NodeKind::Start.default_size());
        assert!(node.config_blob.is_empty());
        assert!(node.template.is_none());
    }

    #[test]
    fn test_add_node_from_template() {
        let catalog = ModuleCatalog::new([]);
        let template = catalog.get("spl_token").unwrap();
        let mut graph = CanvasGraph::default();
        let id = graph.add_node(template.node_kind(), "", [0.0, 0.0], Some(template));

        let node = graph.node(id).unwrap();
        assert_eq!(node.kind(), &NodeKind::Account);
        assert_eq!(node.name, "SPL Token");
        assert_eq!(node.template.as_deref(), Some("spl_token"));
        assert_eq!(node.description.as_deref(), Some(template.description.as_str()));
        let config = config::decode(&node.config_blob);
        assert_eq!(config.parameters["decimals"], ParamValue::Int(9));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut graph = CanvasGraph::default();
        let a = graph.add_node(NodeKind::Data, "a", [0.0, 0.0], None);
        graph.remove_node(a);
        let b = graph.add_node(NodeKind::Data, "a", [0.0, 0.0], None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_node_cascades() {
        let (mut graph, a, b) = two_nodes();
        let c = graph.add_node(NodeKind::Data, "C", [0.0, 0.0], None);
        graph.add_connection(a, b, ConnectionType::Token).unwrap();
        graph.add_connection(b, a, ConnectionType::Data).unwrap();
        let keep = graph.add_connection(c, b, ConnectionType::Data).unwrap();

        assert!(graph.remove_node(a).is_some());
        assert_eq!(graph.connections_for_node(a).count(), 0);
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.connection(keep).is_some());

        // Absent node is a no-op
        let revision = graph.revision();
        assert!(graph.remove_node(a).is_none());
        assert_eq!(graph.revision(), revision);
    }

    #[test]
    fn test_rename() {
        let (mut graph, a, _) = two_nodes();
        assert!(!graph.rename_node(a, "   "));
        assert_eq!(graph.node(a).unwrap().name, "A");
        assert!(graph.rename_node(a, "  Mint  "));
        assert_eq!(graph.node(a).unwrap().name, "Mint");
        assert!(!graph.rename_node(NodeId::new(), "x"));
    }

    #[test]
    fn test_update_node() {
        let (mut graph, a, _) = two_nodes();
        graph
            .update_node(a, NodeUpdate::position(5.0, 6.0).with_description("moved"))
            .unwrap();
        let node = graph.node(a).unwrap();
        assert_eq!(node.position, [5.0, 6.0]);
        assert_eq!(node.description.as_deref(), Some("moved"));
        assert_eq!(node.name, "A");

        let missing = NodeId::new();
        assert_eq!(
            graph.update_node(missing, NodeUpdate::default()),
            Err(GraphError::NodeNotFound(missing))
        );
    }

    #[test]
    fn test_add_connection_errors_leave_graph_unchanged() {
        let (mut graph, a, b) = two_nodes();
        let revision = graph.revision();

        let err = graph.add_connection(a, b, ConnectionType::Nft).unwrap_err();
        assert!(matches!(err, GraphError::IncompatibleConnection { .. }));

        let missing = NodeId::new();
        assert_eq!(
            graph.add_connection(a, missing, ConnectionType::Token),
            Err(GraphError::NodeNotFound(missing))
        );
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.revision(), revision);
    }

    #[test]
    fn test_remove_connection() {
        let (mut graph, a, b) = two_nodes();
        let id = graph.add_connection(a, b, ConnectionType::Token).unwrap();
        assert!(graph.remove_connection(id).is_some());
        assert!(graph.remove_connection(id).is_none());
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_node_at_prefers_topmost() {
        let mut graph = CanvasGraph::default();
        let _below = graph.add_node(NodeKind::Data, "below", [0.0, 0.0], None);
        let above = graph.add_node(NodeKind::Data, "above", [50.0, 50.0], None);
        assert_eq!(graph.node_at([60.0, 60.0]), Some(above));
        assert_eq!(graph.node_at([5000.0, 5000.0]), None);
    }

    #[test]
    fn test_serialization_drops_nothing() {
        let (mut graph, a, b) = two_nodes();
        graph.add_connection(a, b, ConnectionType::Token).unwrap();

        let text = ron::ser::to_string_pretty(&graph, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: CanvasGraph = ron::from_str(&text).unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.connection_count(), 1);
        assert_eq!(loaded.node(a), graph.node(a));
    }

    #[test]
    fn test_restore_advances_revision() {
        let (mut graph, _, _) = two_nodes();
        let snapshot = CanvasGraph::new("Older");
        let revision = graph.revision();
        graph.restore(snapshot);
        assert_eq!(graph.name, "Older");
        assert_eq!(graph.node_count(), 0);
        assert!(graph.revision() > revision);
    }

    #[test]
    fn test_prune_dangling() {
        let (mut graph, a, b) = two_nodes();
        graph.add_connection(a, b, ConnectionType::Token).unwrap();
        // Simulate a file that lost a node but kept its connection
        graph.nodes.shift_remove(&a);
        assert_eq!(graph.prune_dangling(), 1);
        assert_eq!(graph.prune_dangling(), 0);
    }

    #[test]
    fn test_normalize_repairs_hand_edited_nodes() {
        let (mut graph, a, b) = two_nodes();
        graph.add_connection(a, b, ConnectionType::Token).unwrap();

        let mut node = graph.nodes.shift_remove(&a).unwrap();
        node.position = [-5.0, f32::NAN];
        node.size = [0.0, -1.0];
        graph.nodes.insert(NodeId::new(), node);

        let revision = graph.revision();
        assert_eq!(graph.normalize(), 3);
        assert!(graph.revision() > revision);

        let node = graph.node(a).unwrap();
        assert_eq!(node.position, [0.0, 0.0]);
        assert_eq!(node.size, NodeKind::Token.default_size());
        assert!(graph.nodes.iter().all(|(key, node)| *key == node.id));
        assert_eq!(graph.connection_count(), 1);

        assert_eq!(graph.normalize(), 0);
    }
}
