//! Shared fixture node types and helpers for patcher tests.

use serde_json::json;

use crate::wiring::{
    Color, EmissionSink, EventEmitter, InletDefinition, NodeCategory, NodeError, NodeInfo,
    OutletDefinition, Payload, PayloadType, WiringNode,
};

/// Installs a fmt subscriber so traced warnings show up under --nocapture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Emits a stored float on demand.
pub struct FloatSource {
    info: NodeInfo,
    value: f32,
    output_event: EventEmitter,
}

impl Default for FloatSource {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.float_source",
                "Float Source",
                NodeCategory::Source,
                "Emits a stored float value",
            ),
            value: 0.0,
            output_event: EventEmitter::float(),
        }
    }
}

impl WiringNode for FloatSource {
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
            .ok_or_else(|| NodeError::RestoreFailed("missing value".into()))?
            as f32;
        Ok(())
    }
}

/// Records the last float it receives.
pub struct FloatSink {
    info: NodeInfo,
    last: Option<f32>,
}

impl Default for FloatSink {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.float_sink",
                "Float Sink",
                NodeCategory::Output,
                "Records the last received float",
            ),
            last: None,
        }
    }
}

impl WiringNode for FloatSink {
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
        match (inlet, payload) {
            ("input", Payload::Float(v)) => {
                self.last = Some(v);
                true
            }
            _ => false,
        }
    }

    fn serialize_state(&self) -> Option<serde_json::Value> {
        Some(json!({ "last": self.last }))
    }
}

/// Relays bangs: a trigger inlet wired straight to a bang outlet.
pub struct BangSource {
    info: NodeInfo,
    bang_event: EventEmitter,
}

impl Default for BangSource {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.bang_source",
                "Bang Source",
                NodeCategory::Source,
                "Relays bangs",
            ),
            bang_event: EventEmitter::bang(),
        }
    }
}

impl WiringNode for BangSource {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[InletDefinition::trigger("trigger")];
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
        match (inlet, payload) {
            ("trigger", Payload::Bang) => {
                out.bang("bang_event");
                true
            }
            _ => false,
        }
    }
}

/// Emits a stored color on demand.
pub struct ColorSource {
    info: NodeInfo,
    color: Color,
    color_event: EventEmitter,
}

impl Default for ColorSource {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.color_source",
                "Color Source",
                NodeCategory::Source,
                "Emits a stored color",
            ),
            color: Color::WHITE,
            color_event: EventEmitter::color(),
        }
    }
}

impl WiringNode for ColorSource {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] = &[InletDefinition::trigger("send")];
        INLETS
    }

    fn outlets(&self) -> &[OutletDefinition] {
        const OUTLETS: &[OutletDefinition] = &[OutletDefinition::new("color_event")];
        OUTLETS
    }

    fn emitter(&self, member: &str) -> Option<&EventEmitter> {
        (member == "color_event").then_some(&self.color_event)
    }

    fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
        (member == "color_event").then_some(&mut self.color_event)
    }

    fn receive(&mut self, inlet: &str, payload: Payload, out: &mut EmissionSink) -> bool {
        match (inlet, payload) {
            ("send", Payload::Bang) => {
                out.emit("color_event", Payload::Color(self.color));
                true
            }
            _ => false,
        }
    }
}

/// Records the last vector it receives.
pub struct VectorSink {
    info: NodeInfo,
    last: Option<glam::Vec3>,
}

impl Default for VectorSink {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.vector_sink",
                "Vector Sink",
                NodeCategory::Output,
                "Records the last received vector",
            ),
            last: None,
        }
    }
}

impl WiringNode for VectorSink {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        const INLETS: &[InletDefinition] =
            &[InletDefinition::typed("position", PayloadType::Vector3)];
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
        match (inlet, payload) {
            ("position", Payload::Vector3(v)) => {
                self.last = Some(v);
                true
            }
            _ => false,
        }
    }
}

/// Declares an outlet whose emitter payload is outside the wiring set.
pub struct OpaqueSource {
    info: NodeInfo,
    raw_event: EventEmitter,
}

impl Default for OpaqueSource {
    fn default() -> Self {
        Self {
            info: NodeInfo::new(
                "test.opaque_source",
                "Opaque Source",
                NodeCategory::Source,
                "Has an unconnectable outlet",
            ),
            raw_event: EventEmitter::opaque(),
        }
    }
}

impl WiringNode for OpaqueSource {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn inlets(&self) -> &[InletDefinition] {
        &[]
    }

    fn outlets(&self) -> &[OutletDefinition] {
        const OUTLETS: &[OutletDefinition] = &[OutletDefinition::new("raw_event")];
        OUTLETS
    }

    fn emitter(&self, member: &str) -> Option<&EventEmitter> {
        (member == "raw_event").then_some(&self.raw_event)
    }

    fn emitter_mut(&mut self, member: &str) -> Option<&mut EventEmitter> {
        (member == "raw_event").then_some(&mut self.raw_event)
    }

    fn receive(&mut self, _: &str, _: Payload, _: &mut EmissionSink) -> bool {
        false
    }
}
