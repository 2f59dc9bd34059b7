// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor session: the canvas graph plus everything that drives it.
//!
//! The session owns the graph, the module catalog, undo history, one drag
//! controller per node and at most one open configuration session. Every
//! user intent goes through a method here so that it lands in history and,
//! when enabled, on disk.

use crate::history::{History, HistoryError, Operation, StateSnapshot};
use crate::project::{ProjectError, ProjectFile, ProjectMetadata};
use crate::settings::EditorSettings;
use modforge_editor_graph::{
    CanvasGraph, ConfigSession, ConnectionId, ConnectionType, GraphError, ModuleCatalog, NodeId,
    NodeDragController, NodeKind, PointerEvent,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Error from an editor session operation
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Graph rejected the operation
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// History error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Project could not be read or written
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// No template with this ID in the catalog
    #[error("Unknown module template: {0}")]
    UnknownTemplate(String),

    /// A configuration session is required but none is open
    #[error("No configuration session is open")]
    NoConfigSession,

    /// No node with this name or ID
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Saving requires a project directory
    #[error("No project is open")]
    NoProject,
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Drag controller plus the graph state captured when its gesture began
#[derive(Debug)]
struct DragSlot {
    controller: NodeDragController,
    before: Option<(StateSnapshot, u64)>,
}

/// A single open editor
#[derive(Debug)]
pub struct EditorSession {
    graph: CanvasGraph,
    catalog: ModuleCatalog,
    metadata: ProjectMetadata,
    project_dir: Option<PathBuf>,
    history: History,
    drags: HashMap<NodeId, DragSlot>,
    config: Option<ConfigSession>,
    settings: EditorSettings,
    dirty: bool,
}

impl EditorSession {
    /// Start an unsaved session on an existing project file
    pub fn new(project: ProjectFile, settings: EditorSettings) -> Self {
        let catalog = ModuleCatalog::new(project.custom_modules);
        Self {
            graph: project.graph,
            catalog,
            metadata: project.metadata,
            project_dir: None,
            history: History::with_max_depth(settings.history_depth),
            drags: HashMap::new(),
            config: None,
            settings,
            dirty: false,
        }
    }

    /// Open the project in `project_dir`
    pub fn open(project_dir: &Path, settings: EditorSettings) -> Result<Self> {
        let project = ProjectFile::load(project_dir)?;
        let mut session = Self::new(project, settings);
        session.project_dir = Some(project_dir.to_path_buf());
        tracing::info!("Opened project: {} at {:?}", session.metadata.name, project_dir);
        Ok(session)
    }

    /// Create a new project in `project_dir` and open it
    pub fn create(project_dir: &Path, name: &str, settings: EditorSettings) -> Result<Self> {
        let project = ProjectFile::new(name);
        project.save(project_dir)?;
        let mut session = Self::new(project, settings);
        session.project_dir = Some(project_dir.to_path_buf());
        tracing::info!("Created new project: {} at {:?}", name, project_dir);
        Ok(session)
    }

    /// The canvas
    pub fn graph(&self) -> &CanvasGraph {
        &self.graph
    }

    /// The module catalog
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Project metadata
    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Find a node by ID or exact name
    pub fn resolve_node(&self, query: &str) -> Result<NodeId> {
        self.graph
            .nodes()
            .find(|node| node.id.to_string() == query || node.name == query)
            .map(|node| node.id)
            .ok_or_else(|| SessionError::UnknownNode(query.to_string()))
    }

    /// Check if there are unsaved changes
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Add a node of `kind` without a template
    pub fn add_node(&mut self, kind: NodeKind, name: &str, position: [f32; 2]) -> NodeId {
        let description = format!("Add {kind} node");
        self.record(&description, |graph| graph.add_node(kind, name, position, None))
    }

    /// Add a node from a catalog template
    pub fn add_module(&mut self, template_id: &str, position: [f32; 2]) -> Result<NodeId> {
        let template = self
            .catalog
            .get(template_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownTemplate(template_id.to_string()))?;
        let description = format!("Add {}", template.name);
        Ok(self.record(&description, |graph| {
            graph.add_node(template.node_kind(), "", position, Some(&template))
        }))
    }

    /// Delete a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) {
        self.drags.remove(&node_id);
        if self.config.as_ref().is_some_and(|c| c.node_id() == node_id) {
            self.config = None;
        }
        self.record("Delete node", |graph| graph.remove_node(node_id));
    }

    /// Rename a node; blank names are ignored
    pub fn rename_node(&mut self, node_id: NodeId, name: &str) -> bool {
        self.record("Rename node", |graph| graph.rename_node(node_id, name))
    }

    /// Connect two nodes
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        connection_type: ConnectionType,
    ) -> Result<ConnectionId> {
        let description = format!("Connect {connection_type}");
        Ok(self.record(&description, |graph| {
            graph.add_connection(source, target, connection_type)
        })?)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) {
        self.record("Disconnect", |graph| graph.remove_connection(connection_id));
    }

    /// Route a pointer event to a node's drag controller.
    ///
    /// A completed gesture that moved the node becomes one history entry.
    pub fn pointer(&mut self, node_id: NodeId, event: PointerEvent) {
        if self.graph.node(node_id).is_none() {
            self.drags.remove(&node_id);
            return;
        }
        let slot = self.drags.entry(node_id).or_insert_with(|| DragSlot {
            controller: NodeDragController::new(node_id),
            before: None,
        });

        let was_dragging = slot.controller.is_dragging();
        slot.controller.handle(&mut self.graph, event);

        match (was_dragging, slot.controller.is_dragging()) {
            (false, true) => match StateSnapshot::capture(&self.graph) {
                Ok(snapshot) => slot.before = Some((snapshot, self.graph.revision())),
                Err(err) => tracing::warn!("Drag will not be undoable: {err}"),
            },
            (true, false) => {
                if let Some((before, revision)) = slot.before.take() {
                    if self.graph.revision() != revision {
                        self.commit("Move node", before);
                    }
                }
            }
            _ => {}
        }
    }

    /// Open the configuration session for a node, replacing any open one
    pub fn open_config(&mut self, node_id: NodeId) -> Result<&mut ConfigSession> {
        let session = ConfigSession::open(&self.graph, node_id)?;
        Ok(self.config.insert(session))
    }

    /// The open configuration session
    pub fn config_mut(&mut self) -> Option<&mut ConfigSession> {
        self.config.as_mut()
    }

    /// Discard the open configuration session
    pub fn cancel_config(&mut self) {
        self.config = None;
    }

    /// Write the open configuration session into its node
    pub fn save_config(&mut self) -> Result<()> {
        let session = self.config.take().ok_or(SessionError::NoConfigSession)?;
        let description = session.summary();
        self.record(&description, |graph| session.save(graph))?;
        Ok(())
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> Result<String> {
        let (description, graph) = self.history.undo()?;
        self.apply_snapshot(graph);
        tracing::debug!("Undo: {description}");
        Ok(description)
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> Result<String> {
        let (description, graph) = self.history.redo()?;
        self.apply_snapshot(graph);
        tracing::debug!("Redo: {description}");
        Ok(description)
    }

    /// Save the project to its directory
    pub fn save(&mut self) -> Result<()> {
        let dir = self.project_dir.clone().ok_or(SessionError::NoProject)?;
        self.save_to(&dir)
    }

    /// Save the project into `project_dir` and make it the session's directory
    pub fn save_to(&mut self, project_dir: &Path) -> Result<()> {
        self.to_project_file().save(project_dir)?;
        self.project_dir = Some(project_dir.to_path_buf());
        self.dirty = false;
        tracing::info!("Saved project {}", self.metadata.name);
        Ok(())
    }

    /// Snapshot of everything persisted for the project
    pub fn to_project_file(&self) -> ProjectFile {
        ProjectFile {
            version: crate::project::PROJECT_FORMAT_VERSION,
            metadata: self.metadata.clone(),
            graph: self.graph.clone(),
            custom_modules: self.catalog.custom_templates().cloned().collect(),
        }
    }

    /// Run a graph mutation and commit it to history if it changed anything
    fn record<T>(&mut self, description: &str, op: impl FnOnce(&mut CanvasGraph) -> T) -> T {
        let revision = self.graph.revision();
        let before = StateSnapshot::capture(&self.graph);
        let result = op(&mut self.graph);
        if self.graph.revision() == revision {
            return result;
        }
        match before {
            Ok(before) => self.commit(description, before),
            Err(err) => {
                tracing::warn!("{description} will not be undoable: {err}");
                self.mark_changed();
            }
        }
        result
    }

    fn commit(&mut self, description: &str, before: StateSnapshot) {
        match StateSnapshot::capture(&self.graph) {
            Ok(after) => self.history.commit(Operation::new(description, before, after)),
            Err(err) => tracing::warn!("{description} will not be undoable: {err}"),
        }
        self.mark_changed();
    }

    fn apply_snapshot(&mut self, graph: CanvasGraph) {
        self.graph.restore(graph);
        self.drags.clear();
        if let Some(config) = &self.config {
            if self.graph.node(config.node_id()).is_none() {
                self.config = None;
            }
        }
        self.mark_changed();
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        if self.settings.auto_save && self.project_dir.is_some() {
            if let Err(err) = self.save() {
                tracing::error!("Auto-save failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modforge_editor_graph::{config, PointerTarget};

    fn session() -> EditorSession {
        let settings = EditorSettings {
            auto_save: false,
            ..EditorSettings::default()
        };
        EditorSession::new(ProjectFile::new("Test"), settings)
    }

    fn start_node(session: &EditorSession) -> NodeId {
        session.graph().node_ids().next().unwrap()
    }

    #[test]
    fn test_edits_are_undoable() {
        let mut session = session();
        let start = start_node(&session);
        let ix = session.add_node(NodeKind::Instruction, "Mint", [300.0, 200.0]);
        session.connect(start, ix, ConnectionType::Flow).unwrap();
        assert_eq!(session.graph().connection_count(), 1);

        assert_eq!(session.undo().unwrap(), "Connect flow");
        assert_eq!(session.graph().connection_count(), 0);
        session.undo().unwrap();
        assert!(session.graph().node(ix).is_none());

        session.redo().unwrap();
        assert!(session.graph().node(ix).is_some());
    }

    #[test]
    fn test_rejected_edits_leave_no_history() {
        let mut session = session();
        let start = start_node(&session);
        let nft = session.add_node(NodeKind::Nft, "", [0.0, 0.0]);
        let before = session.history().undo_description().map(str::to_string);

        assert!(session.connect(nft, nft, ConnectionType::Nft).is_err());
        assert!(!session.rename_node(start, "  "));
        assert_eq!(
            session.history().undo_description().map(str::to_string),
            before
        );
    }

    #[test]
    fn test_resolve_node() {
        let session = session();
        let start = start_node(&session);
        assert_eq!(session.resolve_node("Program Start").unwrap(), start);
        assert_eq!(session.resolve_node(&start.to_string()).unwrap(), start);
        assert!(matches!(
            session.resolve_node("nope"),
            Err(SessionError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_add_module() {
        let mut session = session();
        let id = session.add_module("nft_collection", [10.0, 10.0]).unwrap();
        let node = session.graph().node(id).unwrap();
        assert_eq!(node.kind(), &NodeKind::Account);
        assert_eq!(node.name, "NFT Collection");
        assert!(matches!(
            session.add_module("missing", [0.0, 0.0]),
            Err(SessionError::UnknownTemplate(_))
        ));
    }

    #[test]
    fn test_drag_is_one_history_entry() {
        let mut session = session();
        let start = start_node(&session);
        session.pointer(
            start,
            PointerEvent::Down {
                position: [90.0, 210.0],
                target: PointerTarget::Body,
            },
        );
        for x in [100.0, 150.0, 200.0] {
            session.pointer(start, PointerEvent::Move { position: [x, 210.0] });
        }
        session.pointer(start, PointerEvent::Up);
        assert_eq!(session.graph().node(start).unwrap().position, [190.0, 200.0]);
        assert_eq!(session.history().undo_description(), Some("Move node"));

        session.undo().unwrap();
        assert_eq!(session.graph().node(start).unwrap().position, [80.0, 200.0]);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_pointer_on_unknown_node_is_ignored() {
        let mut session = session();
        let ghost = NodeId::new();
        session.pointer(
            ghost,
            PointerEvent::Down {
                position: [0.0, 0.0],
                target: PointerTarget::Body,
            },
        );
        session.pointer(ghost, PointerEvent::Up);
        assert!(session.drags.is_empty());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_click_without_move_is_not_recorded() {
        let mut session = session();
        let start = start_node(&session);
        session.pointer(
            start,
            PointerEvent::Down {
                position: [90.0, 210.0],
                target: PointerTarget::Body,
            },
        );
        session.pointer(start, PointerEvent::Up);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_config_round_trip() {
        let mut session = session();
        let token = session.add_node(NodeKind::Token, "Mint", [0.0, 0.0]);

        let form = session.open_config(token).unwrap();
        form.set_parameter("tokenName", "Launch");
        form.append_constraint("fixed supply");
        session.save_config().unwrap();
        assert!(matches!(session.save_config(), Err(SessionError::NoConfigSession)));

        let node = session.graph().node(token).unwrap();
        assert_eq!(node.description.as_deref(), Some("Configured token module"));
        assert_eq!(config::decode(&node.config_blob).constraints, ["fixed supply"]);
        assert_eq!(
            session.history().undo_description(),
            Some("Configured token module")
        );
    }

    #[test]
    fn test_removing_node_closes_its_config() {
        let mut session = session();
        let token = session.add_node(NodeKind::Token, "Mint", [0.0, 0.0]);
        session.open_config(token).unwrap();
        session.remove_node(token);
        assert!(session.config_mut().is_none());
    }

    #[test]
    fn test_save_requires_project_dir() {
        let mut session = session();
        assert!(matches!(session.save(), Err(SessionError::NoProject)));

        let dir = tempfile::tempdir().unwrap();
        session.add_node(NodeKind::Data, "Input", [0.0, 0.0]);
        session.save_to(dir.path()).unwrap();
        assert!(!session.has_unsaved_changes());

        let reopened = EditorSession::open(dir.path(), EditorSettings::default()).unwrap();
        assert_eq!(reopened.graph().node_count(), 2);
    }

    #[test]
    fn test_auto_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            EditorSession::create(dir.path(), "Auto", EditorSettings::default()).unwrap();
        session.add_node(NodeKind::Data, "Input", [0.0, 0.0]);
        assert!(!session.has_unsaved_changes());

        let on_disk = ProjectFile::load(dir.path()).unwrap();
        assert_eq!(on_disk.graph.node_count(), 2);
    }
}
