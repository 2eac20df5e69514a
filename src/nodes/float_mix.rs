//! Float mixing node.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::wiring::{
    EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, PayloadType, WiringNode,
};

/// How the modulation input is combined with the main input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulationType {
    Off,
    Add,
    Subtract,
    Multiply,
    Divide,
    Minimum,
    Maximum,
}

impl ModulationType {
    /// All modulation types, for UI selection.
    pub fn all() -> [ModulationType; 7] {
        [
            ModulationType::Off,
            ModulationType::Add,
            ModulationType::Subtract,
            ModulationType::Multiply,
            ModulationType::Divide,
            ModulationType::Minimum,
            ModulationType::Maximum,
        ]
    }

    /// Returns a human-readable name for the modulation type.
    pub fn name(&self) -> &'static str {
        match self {
            ModulationType::Off => "Off",
            ModulationType::Add => "Add",
            ModulationType::Subtract => "Subtract",
            ModulationType::Multiply => "Multiply",
            ModulationType::Divide => "Divide",
            ModulationType::Minimum => "Minimum",
            ModulationType::Maximum => "Maximum",
        }
    }
}

/// Combines two float streams into one.
///
/// The latest values seen on `input` and `modulation` are held; any arrival
/// on either inlet emits the combined result.
pub struct FloatMix {
    info: NodeInfo,
    modulation_type: ModulationType,
    input_value: f32,
    modulation_value: f32,
    output_event: EventEmitter,
}

impl FloatMix {
    /// Creates a mixer with the given modulation type.
    pub fn with_modulation(modulation_type: ModulationType) -> Self {
        Self {
            modulation_type,
            ..Self::default()
        }
    }

    /// The current modulation type.
    pub fn modulation_type(&self) -> ModulationType {
        self.modulation_type
    }

    /// Sets the modulation type.
    pub fn set_modulation_type(&mut self, modulation_type: ModulationType) {
        self.modulation_type = modulation_type;
    }

    fn mix(&self) -> f32 {
        let (a, b) = (self.input_value, self.modulation_value);
        match self.modulation_type {
            ModulationType::Off => a,
            ModulationType::Add => a + b,
            ModulationType::Subtract => a - b,
            ModulationType::Multiply => a * b,
            ModulationType::Divide => a / b,
            ModulationType::Minimum => a.min(b),
            ModulationType::Maximum => a.max(b),
        }
    }
}

impl Default for FloatMix {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "filter.float_mix",
                "Float Mix",
                NodeCategory::Filter,
                "Combines two float streams",
            ),
            modulation_type: ModulationType::Add,
            input_value: 0.0,
            modulation_value: 0.0,
            output_event: EventEmitter::float(),
        }
    }
}

impl WiringNode for FloatMix {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[
            InletDefinition::typed("input", PayloadType::Float),
            InletDefinition::typed("modulation", PayloadType::Float),
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
            ("input", Payload::Float(v)) => {
                self.input_value = v;
                out.float("output_event", self.mix());
                true
            }
            ("modulation", Payload::Float(v)) => {
                self.modulation_value = v;
                out.float("output_event", self.mix());
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "modulation_type": self.modulation_type }))
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), NodeError> {
        self.modulation_type = serde_json::from_value(state["modulation_type"].clone())
            .map_err(|e| NodeError::RestoreFailed(e.to_string()))?;
        Ok(())
    }
}
