//! Bang filter (gate) node.

use serde_json::json;

use crate::wiring::{
    EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, WiringNode,
};

/// Passes bangs through while the gate is open.
///
/// Triggers on `input` are forwarded to `bang_event` only while open;
/// `open`/`close` control the gate.
pub struct BangFilter {
    info: NodeInfo,
    open: bool,
    bang_event: EventEmitter,
}

impl BangFilter {
    /// Creates the filter with an explicit initial gate state.
    pub fn with_gate(open: bool) -> Self {
        Self {
            open,
            ..Self::default()
        }
    }

    /// Whether the gate currently passes bangs.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Default for BangFilter {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "filter.bang",
                "Bang Filter",
                NodeCategory::Filter,
                "Passes bangs through while the gate is open",
            ),
            open: true,
            bang_event: EventEmitter::bang(),
        }
    }
}

impl WiringNode for BangFilter {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[
            InletDefinition::trigger("input"),
            InletDefinition::trigger("open"),
            InletDefinition::trigger("close"),
        ];
        INLETS
    }

    fn outlets(&self) -> &[OutletDefinition] {
        const OUTLETS: &[OutletDefinition] = &[OutletDefinition::new("bang_event")];
        OUTLETS
    }

    fn emitter(&self, member: &str) -> Option<&EventEmitter> {
        (member == "bang_event").then_some(&self.bang_event)
    }

    fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
        (member == "bang_event").then_some(&mut self.bang_event)
    }

    fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool {
        if payload != Payload::Bang {
            return false;
        }
        match inlet {
            "input" => {
                if self.open {
                    out.bang("bang_event");
                }
                true
            }
            "open" => {
                self.open = true;
                true
            }
            "close" => {
                self.open = false;
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "open": self.open }))
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), NodeError> {
        self.open = state["open"]
            .as_bool()
            .ok_or_else(|| NodeError::RestoreFailed("missing open".into()))?;
        Ok(())
    }
}
