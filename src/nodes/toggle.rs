//! Toggle node.

use serde_json::json;

use crate::wiring::{
    EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, WiringNode,
};

/// Flips between two states on each trigger.
///
/// Every bang arriving at `trigger` inverts the state, fires the matching
/// `on_event`/`off_event` bang, and emits the corresponding value on
/// `value_event`.
pub struct Toggle {
    info: NodeInfo,
    off_value: f32,
    on_value: f32,
    state: bool,
    off_event: EventEmitter,
    on_event: EventEmitter,
    value_event: EventEmitter,
}

impl Toggle {
    /// Creates a toggle with explicit off/on values.
    pub fn with_values(off_value: f32, on_value: f32) -> Self {
        Self {
            off_value,
            on_value,
            ..Self::default()
        }
    }

    /// The current state.
    pub fn is_on(&self) -> bool {
        self.state
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "switching.toggle",
                "Toggle",
                NodeCategory::Switching,
                "Flips between two states on each trigger",
            ),
            off_value: 0.0,
            on_value: 1.0,
            state: false,
            off_event: EventEmitter::bang(),
            on_event: EventEmitter::bang(),
            value_event: EventEmitter::float(),
        }
    }
}

impl WiringNode for Toggle {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[InletDefinition::trigger("trigger")];
        INLETS
    }

    fn outlets(&self) -> &[OutletDefinition] {
        const OUTLETS: &[OutletDefinition] = &[
            OutletDefinition::new("off_event"),
            OutletDefinition::new("on_event"),
            OutletDefinition::new("value_event"),
        ];
        OUTLETS
    }

    fn emitter(&self, member: &str) -> Option<&EventEmitter> {
        match member {
            "off_event" => Some(&self.off_event),
            "on_event" => Some(&self.on_event),
            "value_event" => Some(&self.value_event),
            _ => None,
        }
    }

    fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
        match member {
            "off_event" => Some(&mut self.off_event),
            "on_event" => Some(&mut self.on_event),
            "value_event" => Some(&mut self.value_event),
            _ => None,
        }
    }

    fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool {
        match (inlet, payload) {
            ("trigger", Payload::Bang) => {
                self.state = !self.state;
                if self.state {
                    out.bang("on_event");
                    out.float("value_event", self.on_value);
                } else {
                    out.bang("off_event");
                    out.float("value_event", self.off_value);
                }
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "off_value": self.off_value, "on_value": self.on_value }))
    }

    fn deserialize_state(&mut self, state: &serde_json::Value) -> Result<(), NodeError> {
        self.off_value = state["off_value"]
            .as_f64()
            .ok_or_else(|| NodeError::RestoreFailed("missing off_value".into()))?
            as f32;
        self.on_value = state["on_value"]
            .as_f64()
            .ok_or_else(|| NodeError::RestoreFailed("missing on_value".into()))?
            as f32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_alternates() {
        let mut node = Toggle::default();
        let mut sink = EmissionSink::new();

        assert!(!node.is_on());
        node.receive("trigger", Payload::Bang, &mut sink);
        assert!(node.is_on());
        assert_eq!(
            sink.drain(),
            vec![
                ("on_event", Payload::Bang),
                ("value_event", Payload::Float(1.0)),
            ]
        );

        node.receive("trigger", Payload::Bang, &mut sink);
        assert!(!node.is_on());
        assert_eq!(
            sink.drain(),
            vec![
                ("off_event", Payload::Bang),
                ("value_event", Payload::Float(0.0)),
            ]
        );
    }

    #[test]
    fn test_custom_values() {
        let mut node = Toggle::with_values(-1.0, 3.0);
        let mut sink = EmissionSink::new();

        node.receive("trigger", Payload::Bang, &mut sink);
        assert_eq!(sink.emissions()[1], ("value_event", Payload::Float(3.0)));
    }

    #[test]
    fn test_non_bang_payload_is_refused() {
        let mut node = Toggle::default();
        let mut sink = EmissionSink::new();
        assert!(!node.receive("trigger", Payload::Float(1.0), &mut sink));
        assert!(!node.is_on());
    }

    #[test]
    fn test_state_round_trip() {
        let node = Toggle::with_values(0.25, 0.75);
        let state = node.serialize_state().unwrap();

        let mut restored = Toggle::default();
        restored.deserialize_state(&state).unwrap();
        let mut sink = EmissionSink::new();
        restored.receive("trigger", Payload::Bang, &mut sink);
        assert_eq!(sink.emissions()[1], ("value_event", Payload::Float(0.75)));
    }
}
