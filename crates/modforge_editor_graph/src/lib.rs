// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas graph model for the `ModForge` editor.
//!
//! This crate holds everything with real structure behind the node canvas:
//! - Nodes and typed connections
//! - Connection compatibility rules
//! - Node dragging
//! - Per-node module configuration and its persisted blob
//! - The module template catalog
//!
//! ## Architecture
//!
//! [`CanvasGraph`] is the only mutable state. Drag controllers and
//! configuration sessions are owned by the caller and write into the graph
//! through its public operations; rendering reads plain snapshots.

pub mod catalog;
pub mod compatibility;
pub mod config;
pub mod connection;
pub mod drag;
pub mod graph;
pub mod node;
pub mod schema;
pub mod session;
pub mod templates;

pub use catalog::{ModuleCatalog, ModuleTemplate};
pub use compatibility::{accepts_link, is_compatible};
pub use config::{ConfigError, ModuleConfig, ParamValue};
pub use connection::{Connection, ConnectionId, ConnectionType};
pub use drag::{DragState, NodeDragController, PointerEvent, PointerTarget};
pub use graph::{CanvasGraph, GraphError};
pub use node::{CanvasNode, NodeId, NodeKind, NodeUpdate};
pub use session::ConfigSession;
