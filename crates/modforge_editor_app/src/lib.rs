// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ModForge` editor shell.
//!
//! Wraps the canvas graph with what an editing session needs around it:
//! - Project files on disk
//! - Undo/redo history
//! - Editor settings
//! - The session that routes every edit through the above

pub mod editor;
pub mod history;
pub mod project;
pub mod settings;

pub use editor::{EditorSession, SessionError};
pub use history::History;
pub use project::{ProjectError, ProjectFile, ProjectMetadata};
pub use settings::EditorSettings;
