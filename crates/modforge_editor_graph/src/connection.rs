// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the canvas.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What crosses a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Data transfer between modules
    Data,
    /// Sequential instruction execution
    Instruction,
    /// Token transfers and operations
    Token,
    /// Account creation and management
    Account,
    /// NFT creation and metadata
    Nft,
    /// Program execution control
    Flow,
}

impl ConnectionType {
    /// Get all connection types
    pub fn all() -> &'static [ConnectionType] {
        &[
            Self::Data,
            Self::Instruction,
            Self::Token,
            Self::Account,
            Self::Nft,
            Self::Flow,
        ]
    }

    /// Get display name for this type
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Data => "Data Flow",
            Self::Instruction => "Instruction Flow",
            Self::Token => "Token Flow",
            Self::Account => "Account Flow",
            Self::Nft => "NFT Flow",
            Self::Flow => "Control Flow",
        }
    }

    /// Short description of what this type carries
    pub fn description(&self) -> &'static str {
        match self {
            Self::Data => "Transfers data between modules",
            Self::Instruction => "Sequential execution of instructions",
            Self::Token => "Token transfers and operations",
            Self::Account => "Account creation and management",
            Self::Nft => "NFT creation and metadata",
            Self::Flow => "Program execution control",
        }
    }

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Instruction => "instruction",
            Self::Token => "token",
            Self::Account => "account",
            Self::Nft => "nft",
            Self::Flow => "flow",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a [`ConnectionType`]
#[derive(Debug, thiserror::Error)]
#[error("Unknown connection type: {0}")]
pub struct UnknownConnectionType(pub String);

impl std::str::FromStr for ConnectionType {
    type Err = UnknownConnectionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownConnectionType(s.to_string()))
    }
}

/// A directed, typed link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Declared type
    pub connection_type: ConnectionType,
}

impl Connection {
    /// Create a new connection
    pub fn new(source: NodeId, target: NodeId, connection_type: ConnectionType) -> Self {
        Self {
            id: ConnectionId::new(),
            source,
            target,
            connection_type,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint opposite to `node_id`, if `node_id` is an endpoint
    pub fn other_end(&self, node_id: NodeId) -> Option<NodeId> {
        if self.source == node_id {
            Some(self.target)
        } else if self.target == node_id {
            Some(self.source)
        } else {
            None
        }
    }
}
