//! The core WiringNode trait and supporting types.
//!
//! This module defines the interface every wiring node type implements. A
//! node declares its inlets and outlets as static capability tables, exposes
//! the emitters backing its outlets, and handles inlet dispatch.

use egui::Color32;
use thiserror::Error;

use super::emitter::EventEmitter;
use super::payload::Payload;
use super::slot::{InletDefinition, OutletDefinition};

/// Category of a wiring node, used for menu grouping and UI coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Value and trigger sources.
    Source,
    /// Value-shaping nodes (filters, mixers).
    Filter,
    /// Gates, toggles and other routing nodes.
    Switching,
    /// Nodes that hand values off to the outside world.
    Output,
}

impl NodeCategory {
    /// Returns the color associated with this category.
    pub fn color(&self) -> Color32 {
        match self {
            NodeCategory::Source => Color32::from_rgb(66, 165, 245), // Blue
            NodeCategory::Filter => Color32::from_rgb(129, 199, 132), // Green
            NodeCategory::Switching => Color32::from_rgb(255, 183, 77), // Orange
            NodeCategory::Output => Color32::from_rgb(186, 104, 200), // Purple
        }
    }

    /// Returns a human-readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            NodeCategory::Source => "Source",
            NodeCategory::Filter => "Filter",
            NodeCategory::Switching => "Switching",
            NodeCategory::Output => "Output",
        }
    }
}

/// Static information about a wiring node type.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    /// Unique identifier for the node type (e.g. "filter.float").
    pub id: &'static str,
    /// Human-readable name (e.g. "Float Filter").
    pub name: &'static str,
    /// The category this node belongs to.
    pub category: NodeCategory,
    /// A brief description of what the node does.
    pub description: &'static str,
}

impl NodeInfo {
    /// Creates a new node info.
    pub fn new(
        id: &'static str,
        name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            category,
            description,
        }
    }
}

/// Errors that can occur during node state operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Failed to restore node state from a saved patch.
    #[error("failed to restore node state: {0}")]
    RestoreFailed(String),
}

/// Collects the emissions a node produces while handling an inlet.
///
/// Nodes never invoke their targets directly; they record which outlet fired
/// with which value, and the patch dispatcher routes the emissions through
/// the outlet's persisted bindings. This keeps dispatch synchronous and
/// single-threaded without nodes needing access to their peers.
#[derive(Debug, Default)]
pub struct EmissionSink {
    emissions: Vec<(&'static str, Payload)>,
}

impl EmissionSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an emission from the named outlet.
    pub fn emit(&mut self, outlet: &'static str, payload: Payload) {
        self.emissions.push((outlet, payload));
    }

    /// Records a bang emission from the named outlet.
    pub fn bang(&mut self, outlet: &'static str) {
        self.emit(outlet, Payload::Bang);
    }

    /// Records a float emission from the named outlet.
    pub fn float(&mut self, outlet: &'static str, value: f32) {
        self.emit(outlet, Payload::Float(value));
    }

    /// Returns the recorded emissions in order.
    pub fn emissions(&self) -> &[(&'static str, Payload)] {
        &self.emissions
    }

    /// Drains the recorded emissions, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<(&'static str, Payload)> {
        std::mem::take(&mut self.emissions)
    }

    /// Returns true if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }
}

/// The core trait that all wiring nodes implement.
///
/// A node declares a typed, named contract of inputs and outputs without any
/// central registry of members: `inlets`/`outlets` are the capability table,
/// `emitter` resolves outlet members to the live emitters holding persisted
/// bindings, and `receive` is the inlet dispatch entry point.
///
/// # Example
///
/// ```ignore
/// struct Doubler {
///     output_event: EventEmitter,
/// }
///
/// impl WiringNode for Doubler {
///     fn info(&self) -> &NodeInfo { ... }
///
///     fn inlets(&self) -> &[InletDefinition] {
///         &[InletDefinition::typed("input", PayloadType::Float)]
///     }
///
///     fn outlets(&self) -> &[OutletDefinition] {
///         &[OutletDefinition::new("output_event")]
///     }
///
///     fn emitter(&self, member: &str) -> Option<&EventEmitter> {
///         (member == "output_event").then_some(&self.output_event)
///     }
///
///     fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
///         (member == "output_event").then_some(&mut self.output_event)
///     }
///
///     fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool {
///         match (inlet, payload) {
///             ("input", Payload::Float(v)) => {
///                 out.float("output_event", v * 2.0);
///                 true
///             }
///             _ => false,
///         }
///     }
/// }
/// ```
pub trait WiringNode: Send + 'static {
    /// Returns static information about this node type.
    fn info(&self) -> &NodeInfo;

    /// Returns the inlet definitions, in declaration order.
    ///
    /// The order determines slot layout in the editor and must be stable
    /// for a given type.
    fn inlets(&self) -> &[InletDefinition];

    /// Returns the outlet definitions, in declaration order.
    fn outlets(&self) -> &[OutletDefinition];

    /// Resolves an outlet member name to its emitter.
    ///
    /// Returns `None` for unknown members; the scanner omits outlets whose
    /// member does not resolve.
    fn emitter(&self, member: &str) -> Option<&EventEmitter>;

    /// Resolves an outlet member name to its emitter, mutably.
    fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter>;

    /// Handles a payload arriving at an inlet.
    ///
    /// Emissions are recorded on `out` and routed by the patch dispatcher.
    /// Returns false if the inlet member is unknown or the payload shape is
    /// wrong for it; the dispatcher treats that as a dropped delivery, not
    /// an error.
    fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool;

    /// Serializes node-specific state for saving patches.
    ///
    /// Wiring state (listener bindings) is captured separately; this covers
    /// only the node's own knobs. Returns `None` if the node has nothing to
    /// save beyond its wiring.
    fn serialize_state(&self) -> Option<serde_json::Value> {
        None
    }

    /// Restores node-specific state from a saved patch.
    fn deserialize_state(&mut self, _state: &serde_json::Value) -> Result<(), NodeError> {
        Ok(())
    }
}
