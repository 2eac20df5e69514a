//! The editable graph of node descriptors and derived edges.
//!
//! The graph is a view over a patch: descriptors are scanned from the node
//! instances, and edges are derived from the bindings persisted on their
//! emitters. The bindings are the ground truth; the graph never stores a
//! connection the instances do not carry.

use tracing::{debug, trace, warn};

use crate::wiring::{binder, InletDefinition, InstanceId};

use super::descriptor::NodeDescriptor;
use super::patch::Patch;

/// Identifier of an edge within one scan generation.
///
/// Edge ids are assigned deterministically in scan order; two rescans over
/// an unchanged patch assign identical ids.
pub type EdgeId = u32;

/// A reference to an outlet slot on a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutletRef {
    pub node: InstanceId,
    pub member: String,
}

impl OutletRef {
    pub fn new(node: InstanceId, member: impl Into<String>) -> Self {
        Self {
            node,
            member: member.into(),
        }
    }
}

/// A reference to an inlet slot on a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InletRef {
    pub node: InstanceId,
    pub member: String,
}

impl InletRef {
    pub fn new(node: InstanceId, member: impl Into<String>) -> Self {
        Self {
            node,
            member: member.into(),
        }
    }
}

/// A directed connection from an outlet to an inlet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: OutletRef,
    pub to: InletRef,
}

/// The editable collection of node descriptors and derived edges.
pub struct Graph {
    nodes: Vec<NodeDescriptor>,
    edges: Vec<Edge>,
    valid: bool,
    scanned_revision: u64,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            valid: true,
            scanned_revision: 0,
        }
    }

    /// Creates a graph already scanned from a patch.
    pub fn from_patch(patch: &Patch) -> Self {
        let mut graph = Self::new();
        graph.rescan(patch);
        graph
    }

    /// Returns true while no stale reference has been hit.
    ///
    /// Once an operation runs into a destroyed instance the flag goes false
    /// and stays false until the next rescan.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if the graph reflects the patch's current revision.
    pub fn is_synced(&self, patch: &Patch) -> bool {
        self.valid && self.scanned_revision == patch.revision()
    }

    /// Returns the node descriptors in hierarchy order.
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    /// Looks up a descriptor by instance id.
    pub fn node(&self, id: InstanceId) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns the derived edges.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the edges leaving one outlet.
    pub fn edges_from<'a>(&'a self, from: &'a OutletRef) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.from == from)
    }

    /// Returns the edges arriving at one inlet.
    pub fn edges_to<'a>(&'a self, to: &'a InletRef) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| &e.to == to)
    }

    /// Finds the edge between an outlet and an inlet, if any.
    pub fn edge_between(&self, from: &OutletRef, to: &InletRef) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.from == from && &e.to == to)
    }

    /// Appends a descriptor to the node list. No edge side effects.
    pub fn add_node(&mut self, descriptor: NodeDescriptor) {
        self.nodes.push(descriptor);
    }

    /// Rebuilds every descriptor and edge from the patch.
    ///
    /// The rebuild is fully destructive: all derived state is dropped and
    /// rescanned so nothing stale can survive a hierarchy edit. Bindings
    /// whose endpoints no longer resolve are dropped from the edge list
    /// without touching the persisted state. Rescans are idempotent.
    pub fn rescan(&mut self, patch: &Patch) {
        self.nodes = patch
            .iter()
            .map(|(id, name, position, node)| NodeDescriptor::scan(id, name, position, node))
            .collect();
        self.edges = derive_edges(&self.nodes, patch);
        self.valid = true;
        self.scanned_revision = patch.revision();
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph rescanned"
        );
    }

    /// Checks the type-compatibility rule for a prospective connection.
    ///
    /// True when both slots resolve, the outlet carries a supported payload,
    /// and the payload either is a bang or matches the inlet exactly.
    /// Opaque outlets refuse here; unresolved slots refuse here.
    pub fn can_connect(&self, from: &OutletRef, to: &InletRef) -> bool {
        let Some(outlet) = self.node(from.node).and_then(|n| n.outlet(&from.member)) else {
            return false;
        };
        let Some(inlet) = self.node(to.node).and_then(|n| n.inlet(&to.member)) else {
            return false;
        };
        match outlet.payload {
            Some(payload) => payload.can_connect_to(inlet.payload),
            None => false,
        }
    }

    /// Checks whether the pair is already connected, against the live
    /// binding state rather than the cached edge list.
    pub fn is_connected(&self, patch: &Patch, from: &OutletRef, to: &InletRef) -> bool {
        patch
            .node(from.node)
            .and_then(|n| n.emitter(&from.member))
            .map(|e| e.has_listener(to.node, &to.member))
            .unwrap_or(false)
    }

    /// Connects an outlet to an inlet.
    ///
    /// Returns false, making no changes, on a type mismatch, a duplicate
    /// pair, a binder refusal, or a stale reference. Stale references also
    /// clear the validity flag; the caller is expected to rescan before
    /// continuing.
    pub fn connect(&mut self, patch: &mut Patch, from: &OutletRef, to: &InletRef) -> bool {
        if !patch.contains(from.node) || !patch.contains(to.node) {
            warn!(?from, ?to, "connect against a destroyed instance");
            self.valid = false;
            return false;
        }
        let (Some(from_desc), Some(to_desc)) = (self.node(from.node), self.node(to.node)) else {
            // The patch has instances the graph has not scanned yet.
            self.valid = false;
            return false;
        };

        if from_desc.outlet(&from.member).is_none() {
            return false;
        }
        let Some(inlet) = to_desc.inlet(&to.member) else {
            return false;
        };

        if !self.can_connect(from, to) {
            trace!(?from, ?to, "connection refused: incompatible types");
            return false;
        }
        if self.is_connected(patch, from, to) {
            trace!(?from, ?to, "connection refused: duplicate");
            return false;
        }

        let inlet_def = InletDefinition {
            member: inlet.member,
            payload: inlet.payload,
        };
        let Some(emitter) = patch
            .node_mut(from.node)
            .and_then(|n| n.emitter_mut(&from.member))
        else {
            self.valid = false;
            return false;
        };

        if !binder::bind(emitter, to.node, &inlet_def) {
            return false;
        }

        self.edges = derive_edges(&self.nodes, patch);
        debug!(?from, ?to, "connected");
        true
    }

    /// Removes the connection described by an edge.
    ///
    /// Exactly one persisted binding is removed: the first one matching the
    /// edge's target instance and member. Returns false (no changes, flag
    /// cleared) when the source instance is gone.
    pub fn disconnect(&mut self, patch: &mut Patch, edge: &Edge) -> bool {
        if !patch.contains(edge.from.node) {
            warn!(edge = ?edge, "disconnect against a destroyed instance");
            self.valid = false;
            return false;
        }
        let Some(emitter) = patch
            .node_mut(edge.from.node)
            .and_then(|n| n.emitter_mut(&edge.from.member))
        else {
            return false;
        };

        if !binder::unbind(emitter, edge.to.node, &edge.to.member) {
            return false;
        }

        self.edges = derive_edges(&self.nodes, patch);
        debug!(edge = ?edge, "disconnected");
        true
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the edge list by scanning every outlet's persisted bindings.
///
/// An edge is produced only when both endpoints resolve against the scanned
/// descriptors; orphaned bindings are skipped silently.
fn derive_edges(nodes: &[NodeDescriptor], patch: &Patch) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut next_id: EdgeId = 0;

    for desc in nodes {
        let Some(instance) = patch.node(desc.id) else {
            continue;
        };
        for outlet in &desc.outlets {
            let Some(emitter) = instance.emitter(outlet.member) else {
                continue;
            };
            for binding in emitter.listeners() {
                let resolved = nodes
                    .iter()
                    .find(|n| n.id == binding.target)
                    .and_then(|n| n.inlet(&binding.member));
                if resolved.is_none() {
                    trace!(
                        source = desc.id,
                        target = binding.target,
                        member = %binding.member,
                        "orphaned binding skipped"
                    );
                    continue;
                }
                edges.push(Edge {
                    id: next_id,
                    from: OutletRef::new(desc.id, outlet.member),
                    to: InletRef::new(binding.target, binding.member.clone()),
                });
                next_id += 1;
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::testing::{
        BangSource, ColorSource, FloatSink, FloatSource, OpaqueSource, VectorSink,
    };
    use glam::Vec2;

    fn float_pair() -> (Patch, Graph, OutletRef, InletRef) {
        let mut patch = Patch::new();
        let source = patch.add_node("X", Vec2::ZERO, Box::new(FloatSource::default()));
        let sink = patch.add_node("Y", Vec2::ZERO, Box::new(FloatSink::default()));
        let graph = Graph::from_patch(&patch);
        (
            patch,
            graph,
            OutletRef::new(source, "output_event"),
            InletRef::new(sink, "input"),
        )
    }

    #[test]
    fn test_connect_then_rescan_reports_one_edge() {
        let (mut patch, mut graph, from, to) = float_pair();

        assert!(graph.connect(&mut patch, &from, &to));
        graph.rescan(&patch);
        assert_eq!(graph.edges_from(&from).count(), 1);
        assert!(graph.edge_between(&from, &to).is_some());

        let edge = graph.edge_between(&from, &to).unwrap().clone();
        assert!(graph.disconnect(&mut patch, &edge));
        graph.rescan(&patch);
        assert_eq!(graph.edges().len(), 0);
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let (mut patch, mut graph, from, to) = float_pair();
        graph.connect(&mut patch, &from, &to);

        graph.rescan(&patch);
        let nodes_a: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
        let edges_a = graph.edges().to_vec();

        graph.rescan(&patch);
        let nodes_b: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
        let edges_b = graph.edges().to_vec();

        assert_eq!(nodes_a, nodes_b);
        assert_eq!(edges_a, edges_b);
    }

    #[test]
    fn test_duplicate_connection_is_rejected() {
        let (mut patch, mut graph, from, to) = float_pair();

        assert!(graph.connect(&mut patch, &from, &to));
        assert!(!graph.connect(&mut patch, &from, &to));

        let listeners = patch
            .node(from.node)
            .unwrap()
            .emitter("output_event")
            .unwrap()
            .listener_count();
        assert_eq!(listeners, 1);
    }

    #[test]
    fn test_orphaned_edges_are_pruned_on_rescan() {
        let (mut patch, mut graph, from, to) = float_pair();
        graph.connect(&mut patch, &from, &to);

        patch.remove_node(to.node);
        graph.rescan(&patch);

        assert_eq!(graph.edges().len(), 0);
        assert_eq!(graph.nodes().len(), 1);

        // The persisted binding on the source is untouched.
        let listeners = patch
            .node(from.node)
            .unwrap()
            .emitter("output_event")
            .unwrap()
            .listener_count();
        assert_eq!(listeners, 1);
    }

    #[test]
    fn test_type_mismatch_makes_no_changes() {
        // A color outlet feeding a float inlet is refused everywhere.
        let mut patch = Patch::new();
        let source = patch.add_node("X", Vec2::ZERO, Box::new(ColorSource::default()));
        let sink = patch.add_node("Y", Vec2::ZERO, Box::new(FloatSink::default()));
        let mut graph = Graph::from_patch(&patch);

        let from = OutletRef::new(source, "color_event");
        let to = InletRef::new(sink, "input");

        assert!(!graph.can_connect(&from, &to));
        assert!(!graph.connect(&mut patch, &from, &to));
        assert!(graph.is_valid());

        let listeners = patch
            .node(source)
            .unwrap()
            .emitter("color_event")
            .unwrap()
            .listener_count();
        assert_eq!(listeners, 0);
    }

    #[test]
    fn test_bang_outlet_connects_to_float_inlet() {
        let mut patch = Patch::new();
        let source = patch.add_node("X", Vec2::ZERO, Box::new(BangSource::default()));
        let sink = patch.add_node("Y", Vec2::ZERO, Box::new(FloatSink::default()));
        let mut graph = Graph::from_patch(&patch);

        let from = OutletRef::new(source, "bang_event");
        let to = InletRef::new(sink, "input");

        assert!(graph.can_connect(&from, &to));
        assert!(graph.connect(&mut patch, &from, &to));

        // The persisted binding carries the float sentinel.
        let binding = &patch
            .node(source)
            .unwrap()
            .emitter("bang_event")
            .unwrap()
            .listeners()[0];
        assert_eq!(
            binding.literal,
            Some(crate::wiring::Payload::Float(binder::BANG_FLOAT_SENTINEL))
        );
    }

    #[test]
    fn test_bang_to_vector_inlet_passes_check_but_fails_bind() {
        // The compatibility rule is permissive about bangs; the binder is
        // the strict gate, and the whole connect stays transactional.
        let mut patch = Patch::new();
        let source = patch.add_node("X", Vec2::ZERO, Box::new(BangSource::default()));
        let sink = patch.add_node("Y", Vec2::ZERO, Box::new(VectorSink::default()));
        let mut graph = Graph::from_patch(&patch);

        let from = OutletRef::new(source, "bang_event");
        let to = InletRef::new(sink, "position");

        assert!(graph.can_connect(&from, &to));
        assert!(!graph.connect(&mut patch, &from, &to));

        let listeners = patch
            .node(source)
            .unwrap()
            .emitter("bang_event")
            .unwrap()
            .listener_count();
        assert_eq!(listeners, 0);
        assert_eq!(graph.edges().len(), 0);
    }

    #[test]
    fn test_opaque_outlet_refuses_connections() {
        let mut patch = Patch::new();
        let source = patch.add_node("X", Vec2::ZERO, Box::new(OpaqueSource::default()));
        let sink = patch.add_node("Y", Vec2::ZERO, Box::new(FloatSink::default()));
        let mut graph = Graph::from_patch(&patch);

        // The outlet is discovered and displayed...
        assert!(graph.node(source).unwrap().outlet("raw_event").is_some());

        // ...but refuses every connection attempt.
        let from = OutletRef::new(source, "raw_event");
        let to = InletRef::new(sink, "input");
        assert!(!graph.can_connect(&from, &to));
        assert!(!graph.connect(&mut patch, &from, &to));
    }

    #[test]
    fn test_stale_connect_invalidates_and_rescan_heals() {
        crate::patcher::testing::init_tracing();
        let (mut patch, mut graph, from, to) = float_pair();

        patch.remove_node(to.node);
        assert!(!graph.connect(&mut patch, &from, &to));
        assert!(!graph.is_valid());
        assert!(!graph.is_synced(&patch));

        graph.rescan(&patch);
        assert!(graph.is_valid());
        assert!(graph.is_synced(&patch));
    }

    #[test]
    fn test_disconnect_removes_first_matching_binding() {
        let (mut patch, mut graph, from, to) = float_pair();
        graph.connect(&mut patch, &from, &to);

        // Force a duplicate binding through the binder directly, bypassing
        // the graph's duplicate rejection.
        let inlet = InletDefinition::typed("input", crate::wiring::PayloadType::Float);
        let emitter = patch
            .node_mut(from.node)
            .unwrap()
            .emitter_mut("output_event")
            .unwrap();
        binder::bind(emitter, to.node, &inlet);
        graph.rescan(&patch);
        assert_eq!(graph.edges().len(), 2);

        let edge = graph.edge_between(&from, &to).unwrap().clone();
        assert!(graph.disconnect(&mut patch, &edge));
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_edge_ids_are_deterministic() {
        let (mut patch, mut graph, from, to) = float_pair();
        graph.connect(&mut patch, &from, &to);

        graph.rescan(&patch);
        let ids_a: Vec<_> = graph.edges().iter().map(|e| e.id).collect();
        graph.rescan(&patch);
        let ids_b: Vec<_> = graph.edges().iter().map(|e| e.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_unknown_slots_refuse() {
        let (mut patch, mut graph, from, _to) = float_pair();
        let bad_inlet = InletRef::new(from.node, "no_such_inlet");
        assert!(!graph.can_connect(&from, &bad_inlet));
        assert!(!graph.connect(&mut patch, &from, &bad_inlet));
        assert!(graph.is_valid());
    }
}
