//! Constant value source node.

use serde_json::json;

use crate::wiring::{
    EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, PayloadType, WiringNode,
};

/// Holds a float value and emits it on demand.
///
/// Sending a bang to `send` re-emits the stored value; sending a float to
/// `value` stores it and emits immediately.
pub struct ConstantValue {
    info: NodeInfo,
    value: f32,
    output_event: EventEmitter,
}

impl ConstantValue {
    /// Creates the node with a starting value.
    pub fn with_value(value: f32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// The stored value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the stored value without emitting.
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }
}

impl Default for ConstantValue {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "source.constant",
                "Constant Value",
                NodeCategory::Source,
                "Holds a float value and emits it on demand",
            ),
            value: 0.0,
            output_event: EventEmitter::float(),
        }
    }
}

impl WiringNode for ConstantValue {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[
            InletDefinition::trigger("send"),
            InletDefinition::typed("value", PayloadType::Float),
        ];
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

    fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool {
        match (inlet, payload) {
            ("send", Payload::Bang) => {
                out.float("output_event", self.value);
                true
            }
            ("value", Payload::Float(v)) => {
                self.value = v;
                out.float("output_event", v);
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "value": self.value }))
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), NodeError> {
        self.value = state["value"]
            .as_f64()
            .ok_or_else(|| NodeError::RestoreFailed("missing value".into()))? as f32;
        Ok(())
    }
}
