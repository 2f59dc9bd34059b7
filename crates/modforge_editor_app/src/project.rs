// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project files.
//!
//! A project is a directory holding one RON file with:
//! - Project metadata (name, version, description)
//! - The canvas graph
//! - User-defined module templates

use modforge_editor_graph::{CanvasGraph, ModuleTemplate, NodeKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current project file format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Project file name
pub const PROJECT_FILE_NAME: &str = "project.modforge";

/// Position of the start node in a new project
const START_NODE_POSITION: [f32; 2] = [80.0, 200.0];

/// Error when reading or writing a project
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid project
    #[error("Invalid project file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Project could not be serialized
    #[error("Failed to serialize project: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer editor
    #[error("Project version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,
    /// Project version (semantic versioning)
    pub version: String,
    /// Project description
    #[serde(default)]
    pub description: String,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            name: "My Program".to_string(),
            version: "0.1.0".to_string(),
            description: String::new(),
        }
    }
}

/// Everything persisted for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version
    pub version: u32,
    /// Project metadata
    pub metadata: ProjectMetadata,
    /// The canvas
    pub graph: CanvasGraph,
    /// User-defined module templates
    #[serde(default)]
    pub custom_modules: Vec<ModuleTemplate>,
}

impl ProjectFile {
    /// Create a project with a single start node
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut graph = CanvasGraph::new(name.clone());
        graph.add_node(NodeKind::Start, "", START_NODE_POSITION, None);
        Self {
            version: PROJECT_FORMAT_VERSION,
            metadata: ProjectMetadata {
                name,
                ..ProjectMetadata::default()
            },
            graph,
            custom_modules: Vec::new(),
        }
    }

    /// Get the project file path for a project directory
    pub fn file_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_FILE_NAME)
    }

    /// Check if a directory contains a project
    pub fn is_project_directory(dir: &Path) -> bool {
        Self::file_path(dir).exists()
    }

    /// Parse a project from RON text
    pub fn from_ron(text: &str) -> Result<Self, ProjectError> {
        let mut project: ProjectFile = ron::from_str(text)?;

        if project.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: project.version,
                supported: PROJECT_FORMAT_VERSION,
            });
        }

        project.graph.normalize();
        Ok(project)
    }

    /// Serialize to RON text
    pub fn to_ron(&self) -> Result<String, ProjectError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load the project in `project_dir`
    pub fn load(project_dir: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(Self::file_path(project_dir))?;
        Self::from_ron(&content)
    }

    /// Save into `project_dir`, creating the directory if needed
    pub fn save(&self, project_dir: &Path) -> Result<(), ProjectError> {
        std::fs::create_dir_all(project_dir)?;
        std::fs::write(Self::file_path(project_dir), self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modforge_editor_graph::ConnectionType;

    #[test]
    fn test_new_project_has_start_node() {
        let project = ProjectFile::new("Launchpad");
        assert_eq!(project.metadata.name, "Launchpad");
        assert_eq!(project.graph.node_count(), 1);
        let start = project.graph.nodes().next().unwrap();
        assert_eq!(start.kind(), &NodeKind::Start);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = ProjectFile::new("Round Trip");
        let start = project.graph.node_ids().next().unwrap();
        let ix = project
            .graph
            .add_node(NodeKind::Instruction, "Mint", [300.0, 200.0], None);
        project
            .graph
            .add_connection(start, ix, ConnectionType::Flow)
            .unwrap();
        project
            .custom_modules
            .push(ModuleTemplate::custom("vesting", "Vesting", "DeFi", "Linear vesting"));

        assert!(!ProjectFile::is_project_directory(dir.path()));
        project.save(dir.path()).unwrap();
        assert!(ProjectFile::is_project_directory(dir.path()));

        let loaded = ProjectFile::load(dir.path()).unwrap();
        assert_eq!(loaded.metadata, project.metadata);
        assert_eq!(loaded.graph.node_count(), 2);
        assert_eq!(loaded.graph.connection_count(), 1);
        assert_eq!(loaded.graph.node(ix), project.graph.node(ix));
        assert_eq!(loaded.custom_modules, project.custom_modules);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut project = ProjectFile::new("Future");
        project.version = PROJECT_FORMAT_VERSION + 1;
        let text = project.to_ron().unwrap();
        assert!(matches!(
            ProjectFile::from_ron(&text),
            Err(ProjectError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_hand_edited_positions_are_clamped() {
        let project = ProjectFile::new("Edited");
        let text = project.to_ron().unwrap().replace("80.0", "-80.0");
        assert!(text.contains("-80.0"));

        let loaded = ProjectFile::from_ron(&text).unwrap();
        let start = loaded.graph.nodes().next().unwrap();
        assert_eq!(start.position, [0.0, 200.0]);
    }

    #[test]
    fn test_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(ProjectFile::load(dir.path()), Err(ProjectError::Io(_))));
    }
}
