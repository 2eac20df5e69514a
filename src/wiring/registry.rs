//! Node registry for managing wiring node types.
//!
//! The registry provides a central catalog of available node types, enabling
//! the patcher to instantiate nodes by their ID when building patches, when
//! loading saved documents, and when pasting.

use std::collections::HashMap;

use super::node::{NodeInfo, WiringNode};

/// Factory function type for creating node instances.
pub type NodeFactory = fn() -> Box<dyn WiringNode>;

/// Central registry of available wiring node types.
///
/// # Example
///
/// ```ignore
/// let mut registry = NodeRegistry::new();
/// registry.register::<FloatFilter>();
/// registry.register::<Toggle>();
///
/// if let Some(node) = registry.create("filter.float") {
///     // Add the node to a patch...
/// }
/// ```
pub struct NodeRegistry {
    /// Map of node type ID to factory function.
    factories: HashMap<&'static str, NodeFactory>,
    /// Cached node information for listing, in registration order.
    infos: Vec<NodeInfo>,
}

impl NodeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            infos: Vec::new(),
        }
    }

    /// Registers a node type with the registry.
    ///
    /// A temporary instance is created to extract the node's info, which is
    /// stored along with a factory function.
    ///
    /// # Panics
    ///
    /// Panics if a node type with the same ID is already registered.
    pub fn register<N: WiringNode + Default + 'static>(&mut self) {
        let temp = N::default();
        let info = temp.info().clone();
        let id = info.id;

        if self.factories.contains_key(id) {
            panic!("Node type '{}' is already registered", id);
        }

        self.factories.insert(id, create_node::<N>);
        self.infos.push(info);
    }

    /// Creates a new instance of a node type by its ID.
    ///
    /// Returns `None` if no node type with the given ID is registered.
    pub fn create(&self, id: &str) -> Option<Box<dyn WiringNode>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Returns the info of every registered node type.
    pub fn list_nodes(&self) -> &[NodeInfo] {
        &self.infos
    }

    /// Returns the number of registered node types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no node types are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Checks if a node type with the given ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn create_node<N: WiringNode + Default + 'static>() -> Box<dyn WiringNode> {
    Box::new(N::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::{
        EmissionSink, EventEmitter, InletDefinition, NodeCategory, OutletDefinition, Payload,
        PayloadType,
    };

    struct TestSource {
        info: NodeInfo,
        output_event: EventEmitter,
    }

    impl Default for TestSource {
        fn default() -> Self {
            Self {
                info: NodeInfo::new(
                    "test.source",
                    "Test Source",
                    NodeCategory::Source,
                    "A test source node",
                ),
                output_event: EventEmitter::float(),
            }
        }
    }

    impl WiringNode for TestSource {
        fn info(&self) -> &NodeInfo {
            &self.info
        }

        fn inlets(&self) -> &[InletDefinition] {
            const INLETS: &[InletDefinition] = &[InletDefinition::trigger("trigger")];
            INLETS
        }

        fn outlets(&self) -> &[OutletDefinition] {
            const OUTLETS: &[OutletDefinition] = &[OutletDefinition::new("output_event")];
            OUTLETS
        }

        fn emitter(&self, member: &str) -> Option<&EventEmitter> {
            (member == "output_event").then_some(&self.output_event)
        }

        fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
            (member == "output_event").then_some(&mut self.output_event)
        }

        fn receive(&mut self, inlet: &str, _payload: Payload, out: &mut EmissionSink) -> bool {
            if inlet == "trigger" {
                out.float("output_event", 1.0);
                true
            } else {
                false
            }
        }
    }

    struct TestSink {
        info: NodeInfo,
    }

    impl Default for TestSink {
        fn default() -> Self {
            Self {
                info: NodeInfo::new(
                    "test.sink",
                    "Test Sink",
                    NodeCategory::Output,
                    "A test sink node",
                ),
            }
        }
    }

    impl WiringNode for TestSink {
        fn info(&self) -> &NodeInfo {
            &self.info
        }

        fn inlets(&self) -> &[InletDefinition] {
            const INLETS: &[InletDefinition] = &[InletDefinition::typed("input", PayloadType::Float)];
            INLETS
        }

        fn outlets(&self) -> &[OutletDefinition] {
            &[]
        }

        fn emitter(&self, _member: &str) -> Option<&EventEmitter> {
            None
        }

        fn emitter_mut(&mut self, _member: &str) -> Option<&mut EventEmitter> {
            None
        }

        fn receive(&mut self, inlet: &str, payload: Payload, _out: &mut EmissionSink) -> bool {
            matches!((inlet, payload), ("input", Payload::Float(_)))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = NodeRegistry::new();
        registry.register::<TestSource>();
        registry.register::<TestSink>();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("test.source"));
        assert!(registry.contains("test.sink"));

        let node = registry.create("test.source").unwrap();
        assert_eq!(node.info().id, "test.source");
        assert_eq!(node.info().category, NodeCategory::Source);
    }

    #[test]
    fn test_create_unknown_node() {
        let registry = NodeRegistry::new();
        assert!(registry.create("unknown.node").is_none());
    }

    #[test]
    fn test_list_nodes_keeps_registration_order() {
        let mut registry = NodeRegistry::new();
        registry.register::<TestSource>();
        registry.register::<TestSink>();

        let ids: Vec<&str> = registry.list_nodes().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["test.source", "test.sink"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = NodeRegistry::new();
        registry.register::<TestSource>();
        registry.register::<TestSource>();
    }
}
