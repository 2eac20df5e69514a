//! The patch container.
//!
//! A `Patch` owns the node instances forming one editable graph, keyed by
//! stable instance ids, along with their names and canvas positions. It is
//! the ground truth the editor graph is derived from, and it runs the
//! synchronous event dispatch loop.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;
use tracing::{trace, warn};

use crate::wiring::{Delivery, EmissionSink, InstanceId, Payload, WiringNode};

/// Upper bound on deliveries per `fire` call.
///
/// Bang loops are representable in a patch (nothing forbids wiring a cycle),
/// and dispatch is synchronous, so a runaway cascade has to be cut off
/// rather than unwound.
const MAX_DELIVERIES_PER_FIRE: usize = 4096;

/// One node instance registered in a patch.
struct NodeEntry {
    id: InstanceId,
    name: String,
    position: Vec2,
    node: Box<dyn WiringNode>,
}

/// The set of node instances forming one editable graph.
pub struct Patch {
    entries: Vec<NodeEntry>,
    index: HashMap<InstanceId, usize>,
    next_id: InstanceId,
    revision: u64,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Returns the hierarchy revision.
    ///
    /// The revision is bumped on every structural mutation (add, remove,
    /// rename); the editor graph compares it against the revision it last
    /// scanned to detect that it has gone stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the number of node instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the patch holds no instances.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether an instance with the given id exists.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.index.contains_key(&id)
    }

    /// Adds a node instance, allocating a fresh id for it.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        position: Vec2,
        node: Box<dyn WiringNode>,
    ) -> InstanceId {
        let id = self.next_id;
        self.next_id += 1;
        self.insert_entry(NodeEntry {
            id,
            name: name.into(),
            position,
            node,
        });
        id
    }

    /// Adds a node instance under a caller-provided id.
    ///
    /// Used when restoring saved patches, where ids must survive the round
    /// trip because bindings refer to them. Returns false if the id is
    /// already taken.
    pub fn add_node_with_id(
        &mut self,
        id: InstanceId,
        name: impl Into<String>,
        position: Vec2,
        node: Box<dyn WiringNode>,
    ) -> bool {
        if self.contains(id) || id == 0 {
            return false;
        }
        self.next_id = self.next_id.max(id + 1);
        self.insert_entry(NodeEntry {
            id,
            name: name.into(),
            position,
            node,
        });
        true
    }

    fn insert_entry(&mut self, entry: NodeEntry) {
        self.index.insert(entry.id, self.entries.len());
        self.entries.push(entry);
        self.revision += 1;
    }

    /// Removes a node instance from the patch.
    ///
    /// Bindings on other nodes that point at the removed instance are left
    /// untouched; they become orphans, pruned from the visual graph on the
    /// next rescan and cleaned up only by an explicit cleanup pass.
    pub fn remove_node(&mut self, id: InstanceId) -> Option<Box<dyn WiringNode>> {
        let slot = self.index.remove(&id)?;
        let entry = self.entries.remove(slot);
        // Reindex everything after the removed slot.
        for (i, entry) in self.entries.iter().enumerate().skip(slot) {
            self.index.insert(entry.id, i);
        }
        self.revision += 1;
        Some(entry.node)
    }

    /// Returns a node instance by id.
    pub fn node(&self, id: InstanceId) -> Option<&dyn WiringNode> {
        self.index.get(&id).map(|&i| self.entries[i].node.as_ref())
    }

    /// Returns a node instance by id, mutably.
    pub fn node_mut(&mut self, id: InstanceId) -> Option<&mut Box<dyn WiringNode>> {
        let i = *self.index.get(&id)?;
        Some(&mut self.entries[i].node)
    }

    /// Returns the display name of an instance.
    pub fn name(&self, id: InstanceId) -> Option<&str> {
        self.index.get(&id).map(|&i| self.entries[i].name.as_str())
    }

    /// Renames an instance.
    pub fn set_name(&mut self, id: InstanceId, name: impl Into<String>) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                self.entries[i].name = name.into();
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Returns the canvas position of an instance.
    pub fn position(&self, id: InstanceId) -> Option<Vec2> {
        self.index.get(&id).map(|&i| self.entries[i].position)
    }

    /// Moves an instance on the canvas.
    ///
    /// Layout-only: this does not bump the revision, so dragging a node
    /// around does not force graph rebuilds.
    pub fn set_position(&mut self, id: InstanceId, position: Vec2) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                self.entries[i].position = position;
                true
            }
            None => false,
        }
    }

    /// Finds the first instance with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<InstanceId> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    /// Returns the instance ids in hierarchy order.
    pub fn ids(&self) -> Vec<InstanceId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Iterates over (id, name, position, node) in hierarchy order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &str, Vec2, &dyn WiringNode)> {
        self.entries
            .iter()
            .map(|e| (e.id, e.name.as_str(), e.position, e.node.as_ref()))
    }

    /// Fires an outlet on a node and runs dispatch to completion.
    ///
    /// Deliveries whose target no longer exists are dropped silently (the
    /// binding stays; see `cleanup_orphan_bindings`). Dispatch stops after a
    /// fixed delivery budget so a wired bang loop cannot hang the editor.
    /// Returns the number of deliveries handled.
    pub fn fire(&mut self, source: InstanceId, outlet: &str, payload: Payload) -> usize {
        let mut queue: VecDeque<Delivery> = VecDeque::new();

        match self.node(source).and_then(|n| n.emitter(outlet)) {
            Some(emitter) => queue.extend(emitter.fire(&payload)),
            None => return 0,
        }

        let mut handled = 0;
        while let Some(delivery) = queue.pop_front() {
            if handled >= MAX_DELIVERIES_PER_FIRE {
                warn!(
                    source,
                    outlet, "dispatch budget exhausted; a wiring loop is likely"
                );
                break;
            }

            let Some(&i) = self.index.get(&delivery.target) else {
                trace!(target = delivery.target, "delivery to removed instance dropped");
                continue;
            };

            let entry = &mut self.entries[i];
            let mut sink = EmissionSink::new();
            if entry
                .node
                .receive(&delivery.member, delivery.payload, &mut sink)
            {
                handled += 1;
            }

            for (member, emitted) in sink.drain() {
                if let Some(emitter) = entry.node.emitter(member) {
                    queue.extend(emitter.fire(&emitted));
                }
            }
        }

        handled
    }

    /// Removes every binding whose target instance is no longer in the
    /// patch. Returns the number of bindings removed.
    ///
    /// This is the explicit cleanup pass: removing a node leaves its inbound
    /// bindings in place, and this reclaims them.
    pub fn cleanup_orphan_bindings(&mut self) -> usize {
        let live: Vec<InstanceId> = self.ids();
        let mut removed = 0;

        for entry in &mut self.entries {
            let outlets: Vec<&'static str> =
                entry.node.outlets().iter().map(|o| o.member).collect();
            for member in outlets {
                if let Some(emitter) = entry.node.emitter_mut(member) {
                    let before = emitter.listener_count();
                    let keep: Vec<_> = emitter
                        .listeners()
                        .iter()
                        .filter(|b| live.contains(&b.target))
                        .cloned()
                        .collect();
                    emitter.set_listeners(keep);
                    removed += before - emitter.listener_count();
                }
            }
        }

        if removed > 0 {
            trace!(removed, "orphaned bindings cleaned up");
        }
        removed
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new()
    }
}
