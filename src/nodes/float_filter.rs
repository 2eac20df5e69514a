//! Float filter node.

use serde_json::json;

use crate::wiring::{
    EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, PayloadType, WiringNode,
};

/// Rescales incoming floats with an amplitude and a bias.
///
/// Each value arriving at `input` is emitted as `value * amplitude + bias`.
pub struct FloatFilter {
    info: NodeInfo,
    amplitude: f32,
    bias: f32,
    output_event: EventEmitter,
}

impl FloatFilter {
    /// Creates the filter with explicit response parameters.
    pub fn with_response(amplitude: f32, bias: f32) -> Self {
        Self {
            amplitude,
            bias,
            ..Self::default()
        }
    }

    /// The output gain applied to incoming values.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Sets the output gain.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// The constant offset added to the scaled value.
    pub fn bias(&self) -> f32 {
        self.bias
    }

    /// Sets the constant offset.
    pub fn set_bias(&mut self, bias: f32) {
        self.bias = bias;
    }

    fn eval(&self, input: f32) -> f32 {
        input * self.amplitude + self.bias
    }
}

impl Default for FloatFilter {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "filter.float",
                "Float Filter",
                NodeCategory::Filter,
                "Rescales floats with an amplitude and a bias",
            ),
            amplitude: 1.0,
            bias: 0.0,
            output_event: EventEmitter::float(),
        }
    }
}

impl WiringNode for FloatFilter {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[InletDefinition::typed("input", PayloadType::Float)];
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
            ("input", Payload::Float(v)) => {
                out.float("output_event", self.eval(v));
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "amplitude": self.amplitude, "bias": self.bias }))
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), NodeError> {
        self.amplitude = state["amplitude"]
            .as_f64()
            .ok_or_else(|| NodeError::RestoreFailed("missing amplitude".into()))?
            as f32;
        self.bias = state["bias"]
            .as_f64()
            .ok_or_else(|| NodeError::RestoreFailed("missing bias".into()))? as f32;
        Ok(())
    }
}
