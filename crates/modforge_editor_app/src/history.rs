// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history of canvas graph snapshots.
//!
//! Each committed edit stores the whole graph before and after the edit,
//! serialized with bincode. Undo restores `before`, redo restores `after`.

use modforge_editor_graph::CanvasGraph;
use std::collections::VecDeque;
use thiserror::Error;

/// Default undo history depth
pub const MAX_HISTORY: usize = 100;

/// History errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Serialized graph state
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// Serialized graph
    pub data: Vec<u8>,
}

impl StateSnapshot {
    /// Capture a graph
    pub fn capture(graph: &CanvasGraph) -> Result<Self> {
        Ok(Self {
            data: bincode::serialize(graph)?,
        })
    }

    /// Rebuild the graph
    pub fn restore(&self) -> Result<CanvasGraph> {
        Ok(bincode::deserialize(&self.data)?)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An edit that can be undone/redone
#[derive(Debug, Clone)]
pub struct Operation {
    /// Human-readable description
    pub description: String,
    /// State before the edit
    pub before: StateSnapshot,
    /// State after the edit
    pub after: StateSnapshot,
}

impl Operation {
    /// Create a new operation
    pub fn new(
        description: impl Into<String>,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            description: description.into(),
            before,
            after,
        }
    }

    /// Get memory size of this operation
    pub fn memory_size(&self) -> usize {
        self.before.size() + self.after.size()
    }
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Operation>,
    redo_stack: VecDeque<Operation>,
    max_depth: usize,
    memory_used: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
            memory_used: 0,
        }
    }

    /// Commit an operation, dropping the redo stack
    pub fn commit(&mut self, operation: Operation) {
        self.redo_stack.clear();

        self.memory_used += operation.memory_size();
        self.undo_stack.push_back(operation);

        while self.undo_stack.len() > self.max_depth {
            if let Some(old) = self.undo_stack.pop_front() {
                self.memory_used = self.memory_used.saturating_sub(old.memory_size());
            }
        }
    }

    /// Undo the last operation, returning the graph to restore
    pub fn undo(&mut self) -> Result<(String, CanvasGraph)> {
        let operation = self.undo_stack.pop_back().ok_or(HistoryError::NothingToUndo)?;
        match operation.before.restore() {
            Ok(graph) => {
                self.memory_used = self.memory_used.saturating_sub(operation.memory_size());
                let description = operation.description.clone();
                self.redo_stack.push_back(operation);
                Ok((description, graph))
            }
            Err(err) => {
                self.undo_stack.push_back(operation);
                Err(err)
            }
        }
    }

    /// Redo the last undone operation, returning the graph to restore
    pub fn redo(&mut self) -> Result<(String, CanvasGraph)> {
        let operation = self.redo_stack.pop_back().ok_or(HistoryError::NothingToRedo)?;
        match operation.after.restore() {
            Ok(graph) => {
                self.memory_used += operation.memory_size();
                let description = operation.description.clone();
                self.undo_stack.push_back(operation);
                Ok((description, graph))
            }
            Err(err) => {
                self.redo_stack.push_back(operation);
                Err(err)
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Memory held by the undo stack, in bytes
    pub fn memory_used(&self) -> usize {
        self.memory_used
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.memory_used = 0;
    }

    /// Get description of next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|op| op.description.as_str())
    }

    /// Get description of next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|op| op.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
