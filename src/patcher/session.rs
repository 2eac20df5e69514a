//! The editor session.
//!
//! `EditorSession` is the explicit context every editing operation runs
//! through: it owns the patch, the derived graph, the interaction state
//! machine, the slot layout, the selection, the clipboard and the undo
//! journal. Nothing here is process-global; two sessions can edit two
//! patches side by side.

use egui::Pos2;
use glam::Vec2;
use tracing::{debug, warn};

use crate::persistence::{self, PatchDocument, PatchError};
use crate::wiring::{InstanceId, NodeRegistry, Payload};

use super::graph::{Edge, Graph, InletRef, OutletRef};
use super::interaction::{GestureOutcome, Interaction, SlotAddr, SlotLayout};
use super::patch::Patch;
use super::undo::UndoStack;

/// A node captured by the copy command.
#[derive(Clone, Debug)]
pub struct ClipboardEntry {
    type_id: String,
    name: String,
    state: Option<serde_json::Value>,
}

/// One editing session over one patch.
pub struct EditorSession {
    name: String,
    registry: NodeRegistry,
    patch: Patch,
    graph: Graph,
    interaction: Interaction,
    layout: SlotLayout,
    selection: Option<InstanceId>,
    clipboard: Option<ClipboardEntry>,
    undo: UndoStack,
}

impl EditorSession {
    /// Creates a session over an empty patch.
    pub fn new(name: impl Into<String>, registry: NodeRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
            patch: Patch::new(),
            graph: Graph::new(),
            interaction: Interaction::new(),
            layout: SlotLayout::new(),
            selection: None,
            clipboard: None,
            undo: UndoStack::new(),
        }
    }

    /// The patch name (used for window titles and saved documents).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the patch.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The node type registry backing this session.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// The underlying patch (read-only; all mutation goes through the
    /// session so it lands in the undo journal).
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    #[cfg(test)]
    pub(crate) fn patch_mut(&mut self) -> &mut Patch {
        &mut self.patch
    }

    /// The derived graph view.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The slot layout, refreshed by the GUI each frame.
    pub fn layout_mut(&mut self) -> &mut SlotLayout {
        &mut self.layout
    }

    /// The slot layout, for reading anchors.
    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// The interaction machine, for rendering drag feedback.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Lazily resynchronizes the graph with the patch.
    ///
    /// Call once per frame before reading the graph: if the hierarchy moved
    /// or a stale reference invalidated the view, this rebuilds it.
    pub fn sync(&mut self) {
        if !self.graph.is_synced(&self.patch) {
            self.graph.rescan(&self.patch);
            self.validate_selection();
        }
    }

    /// Forces a full rebuild regardless of revision.
    pub fn rescan(&mut self) {
        self.graph.rescan(&self.patch);
        self.validate_selection();
    }

    // ========================================================================
    // Node operations
    // ========================================================================

    /// Creates a node of the given registered type at a canvas position.
    pub fn add_node(&mut self, type_id: &str, position: Vec2) -> Option<InstanceId> {
        let node = self.registry.create(type_id)?;
        let before = self.snapshot();

        let name = node.info().name.to_string();
        let id = self.patch.add_node(name, position, node);
        self.undo.push("Add Node", before);
        self.graph.rescan(&self.patch);
        self.selection = Some(id);
        debug!(id, type_id, "node added");
        Some(id)
    }

    /// Deletes a node from the patch.
    ///
    /// Inbound bindings on other nodes are left orphaned on purpose; run
    /// `cleanup_orphans` to reclaim them.
    pub fn delete_node(&mut self, id: InstanceId) -> bool {
        if !self.patch.contains(id) {
            return false;
        }
        let before = self.snapshot();
        self.patch.remove_node(id);
        self.undo.push("Delete Node", before);
        self.graph.rescan(&self.patch);
        self.validate_selection();
        debug!(id, "node deleted");
        true
    }

    /// Renames a node instance.
    pub fn rename_node(&mut self, id: InstanceId, name: impl Into<String>) -> bool {
        if !self.patch.contains(id) {
            return false;
        }
        let before = self.snapshot();
        self.patch.set_name(id, name);
        self.undo.push("Rename Node", before);
        self.graph.rescan(&self.patch);
        true
    }

    /// Moves a node on the canvas. Layout-only; not journaled.
    pub fn move_node(&mut self, id: InstanceId, position: Vec2) -> bool {
        self.patch.set_position(id, position)
    }

    /// Removes every binding pointing at instances that no longer exist.
    pub fn cleanup_orphans(&mut self) -> usize {
        let before = self.snapshot();
        let removed = self.patch.cleanup_orphan_bindings();
        if removed > 0 {
            self.undo.push("Clean Up", before);
            self.graph.rescan(&self.patch);
        }
        removed
    }

    /// Fires an outlet on a node, running dispatch through the patch.
    pub fn fire(&mut self, id: InstanceId, outlet: &str, payload: Payload) -> usize {
        self.patch.fire(id, outlet, payload)
    }

    // ========================================================================
    // Connection operations
    // ========================================================================

    /// Connects an outlet to an inlet, journaled.
    pub fn connect(&mut self, from: &OutletRef, to: &InletRef) -> bool {
        let before = self.snapshot();
        if self.graph.connect(&mut self.patch, from, to) {
            self.undo.push("Connect", before);
            true
        } else {
            false
        }
    }

    /// Removes the connection described by an edge, journaled.
    pub fn disconnect(&mut self, edge: &Edge) -> bool {
        let before = self.snapshot();
        if self.graph.disconnect(&mut self.patch, edge) {
            self.undo.push("Disconnect", before);
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Selection and clipboard
    // ========================================================================

    /// The selected node, if any.
    pub fn selection(&self) -> Option<InstanceId> {
        self.selection
    }

    /// Selects a node (or clears the selection with `None`).
    pub fn select(&mut self, id: Option<InstanceId>) {
        self.selection = id.filter(|&id| self.patch.contains(id));
    }

    fn validate_selection(&mut self) {
        if let Some(id) = self.selection {
            if !self.patch.contains(id) {
                self.selection = None;
            }
        }
    }

    /// Copies the selected node into the session clipboard.
    pub fn copy_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let Some(node) = self.patch.node(id) else {
            return false;
        };
        self.clipboard = Some(ClipboardEntry {
            type_id: node.info().id.to_string(),
            name: self.patch.name(id).unwrap_or(node.info().name).to_string(),
            state: node.serialize_state(),
        });
        true
    }

    /// Pastes the clipboard as a new node at a canvas position.
    ///
    /// Wiring is intentionally not copied; only the node type, name and
    /// private state travel through the clipboard.
    pub fn paste(&mut self, position: Vec2) -> Option<InstanceId> {
        let entry = self.clipboard.clone()?;
        let mut node = self.registry.create(&entry.type_id)?;
        if let Some(state) = &entry.state {
            if let Err(err) = node.deserialize_state(state) {
                warn!(%err, "pasted node refused its state; using defaults");
            }
        }

        let before = self.snapshot();
        let id = self.patch.add_node(entry.name, position, node);
        self.undo.push("Paste", before);
        self.graph.rescan(&self.patch);
        self.selection = Some(id);
        Some(id)
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Returns true if there is an operation to undo.
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Returns true if there is an operation to redo.
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Undoes the most recent journaled operation.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.undo.undo(current) {
            Some(entry) => self.restore(entry.document),
            None => false,
        }
    }

    /// Redoes the most recently undone operation.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.undo.redo(current) {
            Some(entry) => self.restore(entry.document),
            None => false,
        }
    }

    fn snapshot(&self) -> PatchDocument {
        persistence::snapshot(&self.patch, self.name.clone())
    }

    fn restore(&mut self, document: PatchDocument) -> bool {
        match persistence::instantiate(&document, &self.registry) {
            Ok(patch) => {
                self.patch = patch;
                // The restored hierarchy invalidates any gesture in flight.
                self.interaction.cancel();
                self.graph.rescan(&self.patch);
                self.validate_selection();
                true
            }
            Err(err) => {
                warn!(%err, "undo restore failed");
                false
            }
        }
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    /// Press at a canvas position: starts a drag if a slot is under it.
    pub fn pointer_pressed(&mut self, pos: Pos2) {
        match self.layout.hit_test(pos) {
            Some(SlotAddr::Outlet(outlet)) => {
                self.select(Some(outlet.node));
                self.interaction.press_outlet(outlet, pos);
            }
            Some(SlotAddr::Inlet(inlet)) => {
                self.select(Some(inlet.node));
                self.interaction.press_inlet(inlet, pos, &self.graph);
            }
            None => {}
        }
    }

    /// Pointer movement while a gesture may be active.
    pub fn pointer_moved(&mut self, pos: Pos2) {
        let hover = self.layout.hit_test(pos);
        self.interaction
            .pointer_moved(pos, hover.as_ref(), &self.graph, &self.patch);
    }

    /// Release: commits or discards the gesture.
    ///
    /// A re-route commits as a single journal entry even though it removes
    /// one binding and adds another.
    pub fn pointer_released(&mut self, pos: Pos2) {
        self.pointer_moved(pos);
        match self.interaction.release() {
            GestureOutcome::Connect { from, to } => {
                self.connect(&from, &to);
            }
            GestureOutcome::Reroute { remove, from, to } => {
                let before = self.snapshot();
                let removed = self.graph.disconnect(&mut self.patch, &remove);
                let connected = self.graph.connect(&mut self.patch, &from, &to);
                if removed || connected {
                    self.undo.push("Reconnect", before);
                }
            }
            GestureOutcome::None | GestureOutcome::Discarded | GestureOutcome::Unchanged => {}
        }
    }

    /// Explicit cancel (Escape): discards the gesture with no mutation.
    pub fn cancel_gesture(&mut self) -> bool {
        self.interaction.cancel()
    }

    /// Endpoints of the working edge, while a gesture is active.
    pub fn working_edge(&self) -> Option<(Pos2, Pos2)> {
        self.interaction.working_edge(&self.layout)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Saves the patch to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), PatchError> {
        persistence::save_to_file(&self.snapshot(), path)
    }

    /// Replaces the patch with one loaded from a JSON file.
    ///
    /// The undo journal is cleared; the loaded state is the new baseline.
    pub fn load(&mut self, path: &std::path::Path) -> Result<(), PatchError> {
        let document = persistence::load_from_file(path)?;
        let patch = persistence::instantiate(&document, &self.registry)?;
        self.name = document.name;
        self.patch = patch;
        self.interaction.cancel();
        self.selection = None;
        self.undo.clear();
        self.graph.rescan(&self.patch);
        Ok(())
    }
}
