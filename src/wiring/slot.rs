//! Slot definitions for wiring nodes.
//!
//! Slots are the connection points declared by a node type: inlets receive
//! payloads, outlets name the event emitters that send them.

use super::PayloadType;

/// Definition of an inlet on a wiring node.
///
/// An inlet binds a member name (the target the dispatcher calls into) to a
/// declared payload type. A trigger inlet takes no data and is declared with
/// the `Bang` payload type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InletDefinition {
    /// The member name the binding targets. Must be unique within a node.
    pub member: &'static str,
    /// The payload type this inlet accepts.
    pub payload: PayloadType,
}

impl InletDefinition {
    /// Creates an inlet that accepts a data-carrying payload.
    pub const fn typed(member: &'static str, payload: PayloadType) -> Self {
        Self { member, payload }
    }

    /// Creates a trigger inlet: invoked with no data.
    pub const fn trigger(member: &'static str) -> Self {
        Self {
            member,
            payload: PayloadType::Bang,
        }
    }

    /// Returns true if this inlet takes no data.
    pub fn is_trigger(&self) -> bool {
        self.payload == PayloadType::Bang
    }
}

/// Definition of an outlet on a wiring node.
///
/// An outlet names one event emitter field on the node. The payload type is
/// not declared here; it is read from the emitter itself when the node is
/// scanned, so declaration and behavior cannot drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutletDefinition {
    /// The emitter member name. Must resolve through `WiringNode::emitter`.
    pub member: &'static str,
}

impl OutletDefinition {
    /// Creates an outlet definition for the named emitter.
    pub const fn new(member: &'static str) -> Self {
        Self { member }
    }
}
