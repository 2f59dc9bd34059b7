// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node drag interaction.
//!
//! A [`NodeDragController`] belongs to one node's interaction surface and turns
//! pointer events into position updates on the [`CanvasGraph`]. Controllers
//! for different nodes are independent.

use crate::graph::CanvasGraph;
use crate::node::{clamp_position, NodeId, NodeUpdate};

/// What the pointer was pressed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The node body
    Body,
    /// An interactive child control (button, text field). Never starts a drag.
    Control,
}

/// Pointer input, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed
    Down {
        /// Pointer position
        position: [f32; 2],
        /// What was under the pointer
        target: PointerTarget,
    },
    /// Pointer moved
    Move {
        /// Pointer position
        position: [f32; 2],
    },
    /// Button released
    Up,
}

/// Drag state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,
    /// Dragging a node
    Dragging {
        /// Node being moved
        node_id: NodeId,
        /// Pointer position minus node position at press time
        offset: [f32; 2],
    },
}

/// Drag state machine for a single node
#[derive(Debug, Clone)]
pub struct NodeDragController {
    node_id: NodeId,
    state: DragState,
}

impl NodeDragController {
    /// Create an idle controller for `node_id`
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            state: DragState::Idle,
        }
    }

    /// The node this controller moves
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Current state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Feed one pointer event
    pub fn handle(&mut self, graph: &mut CanvasGraph, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, target } => self.pointer_down(graph, position, target),
            PointerEvent::Move { position } => self.pointer_move(graph, position),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    /// Press on the node. Starts a drag when pressed on the body.
    pub fn pointer_down(&mut self, graph: &CanvasGraph, pointer: [f32; 2], target: PointerTarget) {
        if self.is_dragging() || target == PointerTarget::Control {
            return;
        }
        let Some(node) = graph.node(self.node_id) else {
            return;
        };
        let offset = [pointer[0] - node.position[0], pointer[1] - node.position[1]];
        tracing::debug!("Drag started on node {}", self.node_id);
        self.state = DragState::Dragging {
            node_id: self.node_id,
            offset,
        };
    }

    /// Move the pointer. Writes the clamped position while dragging.
    pub fn pointer_move(&mut self, graph: &mut CanvasGraph, pointer: [f32; 2]) {
        let DragState::Dragging { node_id, offset } = self.state else {
            return;
        };
        let [x, y] = clamp_position([pointer[0] - offset[0], pointer[1] - offset[1]]);
        if graph.update_node(node_id, NodeUpdate::position(x, y)).is_err() {
            // The node was deleted mid-gesture; there is nothing left to move.
            tracing::debug!("Node {node_id} vanished during drag");
            self.state = DragState::Idle;
        }
    }

    /// Release the pointer. Ends any drag.
    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            tracing::debug!("Drag ended on node {}", self.node_id);
        }
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn setup() -> (CanvasGraph, NodeId, NodeDragController) {
        let mut graph = CanvasGraph::default();
        let id = graph.add_node(NodeKind::Token, "A", [100.0, 100.0], None);
        (graph, id, NodeDragController::new(id))
    }

    #[test]
    fn test_drag_moves_by_offset() {
        let (mut graph, id, mut drag) = setup();
        drag.pointer_down(&graph, [110.0, 120.0], PointerTarget::Body);
        assert_eq!(
            drag.state(),
            DragState::Dragging {
                node_id: id,
                offset: [10.0, 20.0]
            }
        );

        drag.pointer_move(&mut graph, [210.0, 170.0]);
        assert_eq!(graph.node(id).unwrap().position, [200.0, 150.0]);
        drag.pointer_move(&mut graph, [160.0, 130.0]);
        assert_eq!(graph.node(id).unwrap().position, [150.0, 110.0]);

        drag.pointer_up();
        assert_eq!(drag.state(), DragState::Idle);
        drag.pointer_move(&mut graph, [500.0, 500.0]);
        assert_eq!(graph.node(id).unwrap().position, [150.0, 110.0]);
    }

    #[test]
    fn test_drag_clamps_to_zero() {
        let (mut graph, id, mut drag) = setup();
        drag.pointer_down(&graph, [100.0, 100.0], PointerTarget::Body);
        drag.pointer_move(&mut graph, [-40.0, 300.0]);
        assert_eq!(graph.node(id).unwrap().position, [0.0, 300.0]);
        drag.pointer_move(&mut graph, [250.0, -1.0]);
        assert_eq!(graph.node(id).unwrap().position, [250.0, 0.0]);
        // No upper bound
        drag.pointer_move(&mut graph, [1.0e6, 2.0e6]);
        assert_eq!(graph.node(id).unwrap().position, [1.0e6, 2.0e6]);
    }

    #[test]
    fn test_control_press_does_not_drag() {
        let (mut graph, id, mut drag) = setup();
        drag.pointer_down(&graph, [110.0, 110.0], PointerTarget::Control);
        assert!(!drag.is_dragging());
        drag.pointer_move(&mut graph, [300.0, 300.0]);
        assert_eq!(graph.node(id).unwrap().position, [100.0, 100.0]);
    }

    #[test]
    fn test_malformed_events_are_ignored() {
        let (mut graph, id, mut drag) = setup();
        let revision = graph.revision();
        drag.handle(&mut graph, PointerEvent::Move { position: [1.0, 1.0] });
        drag.handle(&mut graph, PointerEvent::Up);
        assert_eq!(graph.revision(), revision);
        assert_eq!(graph.node(id).unwrap().position, [100.0, 100.0]);
    }

    #[test]
    fn test_second_press_keeps_first_offset() {
        let (mut graph, id, mut drag) = setup();
        drag.pointer_down(&graph, [110.0, 110.0], PointerTarget::Body);
        drag.pointer_down(&graph, [190.0, 190.0], PointerTarget::Body);
        drag.pointer_move(&mut graph, [110.0, 110.0]);
        assert_eq!(graph.node(id).unwrap().position, [100.0, 100.0]);
    }

    #[test]
    fn test_independent_controllers() {
        let (mut graph, a, mut drag_a) = setup();
        let b = graph.add_node(NodeKind::Data, "B", [400.0, 0.0], None);
        let mut drag_b = NodeDragController::new(b);

        drag_a.pointer_down(&graph, [100.0, 100.0], PointerTarget::Body);
        drag_b.pointer_down(&graph, [400.0, 0.0], PointerTarget::Body);
        drag_a.pointer_move(&mut graph, [120.0, 100.0]);
        drag_b.pointer_move(&mut graph, [400.0, 50.0]);

        assert_eq!(graph.node(a).unwrap().position, [120.0, 100.0]);
        assert_eq!(graph.node(b).unwrap().position, [400.0, 50.0]);
    }

    #[test]
    fn test_node_removed_mid_drag() {
        let (mut graph, id, mut drag) = setup();
        drag.pointer_down(&graph, [100.0, 100.0], PointerTarget::Body);
        graph.remove_node(id);
        drag.pointer_move(&mut graph, [150.0, 150.0]);
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_press_on_missing_node() {
        let mut graph = CanvasGraph::default();
        let mut drag = NodeDragController::new(NodeId::new());
        drag.handle(
            &mut graph,
            PointerEvent::Down {
                position: [0.0, 0.0],
                target: PointerTarget::Body,
            },
        );
        assert!(!drag.is_dragging());
    }
}
