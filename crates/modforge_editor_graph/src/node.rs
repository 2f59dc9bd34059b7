// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas node definitions.

use crate::connection::ConnectionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of module a node represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Program instruction
    Instruction,
    /// Account declaration
    Account,
    /// Token module
    Token,
    /// NFT module
    Nft,
    /// Data holder
    Data,
    /// Control flow
    Flow,
    /// Program entry point
    Start,
    /// User-defined module kind
    Custom(String),
}

impl NodeKind {
    /// Default canvas size `[width, height]` for this kind
    pub fn default_size(&self) -> [f32; 2] {
        match self {
            Self::Start => [200.0, 120.0],
            Self::Data | Self::Flow => [180.0, 100.0],
            _ => [220.0, 140.0],
        }
    }

    /// Default display name for a node of this kind
    pub fn default_name(&self) -> String {
        match self {
            Self::Instruction => "Instruction".to_string(),
            Self::Account => "Account".to_string(),
            Self::Token => "Token".to_string(),
            Self::Nft => "NFT".to_string(),
            Self::Data => "Data".to_string(),
            Self::Flow => "Flow".to_string(),
            Self::Start => "Program Start".to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// The connection type this kind speaks on the canvas, if any.
    ///
    /// The start node is the program's control-flow entry, so it maps to
    /// [`ConnectionType::Flow`]. Custom kinds have no rule of their own.
    pub fn connection_type(&self) -> Option<ConnectionType> {
        match self {
            Self::Instruction => Some(ConnectionType::Instruction),
            Self::Account => Some(ConnectionType::Account),
            Self::Token => Some(ConnectionType::Token),
            Self::Nft => Some(ConnectionType::Nft),
            Self::Data => Some(ConnectionType::Data),
            Self::Flow | Self::Start => Some(ConnectionType::Flow),
            Self::Custom(_) => None,
        }
    }

    /// Lowercase identifier, as used in persisted data and summaries
    pub fn as_str(&self) -> &str {
        match self {
            Self::Instruction => "instruction",
            Self::Account => "account",
            Self::Token => "token",
            Self::Nft => "nft",
            Self::Data => "data",
            Self::Flow => "flow",
            Self::Start => "start",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = std::convert::Infallible;

    /// Parses the built-in kinds case-insensitively; anything else becomes
    /// [`NodeKind::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "instruction" => Self::Instruction,
            "account" => Self::Account,
            "token" => Self::Token,
            "nft" => Self::Nft,
            "data" => Self::Data,
            "flow" => Self::Flow,
            "start" => Self::Start,
            _ => Self::Custom(s.trim().to_string()),
        };
        Ok(kind)
    }
}

/// A node placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    /// Unique instance ID
    pub id: NodeId,
    /// Module kind, fixed at creation
    kind: NodeKind,
    /// Display name
    pub name: String,
    /// Top-left corner on the canvas, never negative
    pub position: [f32; 2],
    /// Width and height on the canvas
    pub size: [f32; 2],
    /// Free text description
    pub description: Option<String>,
    /// Serialized module configuration
    pub config_blob: String,
    /// ID of the template the node was created from
    pub template: Option<String>,
}

impl CanvasNode {
    /// Create a node of `kind` with built-in defaults
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let size = kind.default_size();
        Self {
            id: NodeId::new(),
            kind,
            name: name.into(),
            position: [0.0, 0.0],
            size,
            description: None,
            config_blob: String::new(),
            template: None,
        }
    }

    /// Set the position, clamped to the non-negative quadrant
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = clamp_position([x, y]);
        self
    }

    /// The node's kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Canvas rectangle as `[min_x, min_y, max_x, max_y]`
    pub fn bounds(&self) -> [f32; 4] {
        [
            self.position[0],
            self.position[1],
            self.position[0] + self.size[0],
            self.position[1] + self.size[1],
        ]
    }

    /// Check whether a canvas point falls inside the node
    pub fn contains(&self, point: [f32; 2]) -> bool {
        let [min_x, min_y, max_x, max_y] = self.bounds();
        point[0] >= min_x && point[0] <= max_x && point[1] >= min_y && point[1] <= max_y
    }
}

/// Partial update for [`CanvasNode`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    /// New display name
    pub name: Option<String>,
    /// New position
    pub position: Option<[f32; 2]>,
    /// New description
    pub description: Option<String>,
    /// New configuration blob
    pub config_blob: Option<String>,
}

impl NodeUpdate {
    /// Update only the position
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            position: Some([x, y]),
            ..Self::default()
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the configuration blob
    pub fn with_config_blob(mut self, blob: impl Into<String>) -> Self {
        self.config_blob = Some(blob.into());
        self
    }

    /// Merge the supplied fields into `node`
    pub(crate) fn apply(self, node: &mut CanvasNode) {
        if let Some(name) = self.name {
            node.name = name;
        }
        if let Some(position) = self.position {
            node.position = clamp_position(position);
        }
        if let Some(description) = self.description {
            node.description = Some(description);
        }
        if let Some(blob) = self.config_blob {
            node.config_blob = blob;
        }
    }
}

/// Clamp both coordinates to a minimum of zero. NaN also maps to zero.
pub fn clamp_position(position: [f32; 2]) -> [f32; 2] {
    [position[0].max(0.0), position[1].max(0.0)]
}
