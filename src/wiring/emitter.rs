//! Event emitters and their persisted listener bindings.
//!
//! Each outlet on a node owns one `EventEmitter`. The emitter's listener
//! list is the persisted wiring state: an edge exists in the editor graph
//! exactly when a binding exists here, never the other way around.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Payload, PayloadType};

/// Unique identifier of a node instance within a patch.
pub type InstanceId = u64;

/// The payload class of an emitter, fixed at construction.
///
/// `Opaque` marks an emitter whose payload falls outside the wiring type
/// set. Such outlets are still discovered and displayed, but every
/// connection attempt against them is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    Bang,
    Float,
    Vector3,
    Quaternion,
    Color,
    Opaque,
}

impl EmitterKind {
    /// The payload type this emitter carries, or `None` for `Opaque`.
    pub fn payload_type(&self) -> Option<PayloadType> {
        match self {
            EmitterKind::Bang => Some(PayloadType::Bang),
            EmitterKind::Float => Some(PayloadType::Float),
            EmitterKind::Vector3 => Some(PayloadType::Vector3),
            EmitterKind::Quaternion => Some(PayloadType::Quaternion),
            EmitterKind::Color => Some(PayloadType::Color),
            EmitterKind::Opaque => None,
        }
    }
}

/// One persisted listener record on an emitter.
///
/// This is the wire format of a connection: the target instance, the inlet
/// member to invoke, and an optional literal argument. When `literal` is
/// set, the target is invoked with it instead of the fired value (used for
/// the bang-to-float sentinel).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub target: InstanceId,
    pub member: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Payload>,
}

impl Binding {
    /// Creates a forwarding binding: the fired value is passed through.
    pub fn forward(target: InstanceId, member: impl Into<String>) -> Self {
        Self {
            target,
            member: member.into(),
            literal: None,
        }
    }

    /// Creates a literal binding: the stored value is sent on every fire.
    pub fn literal(target: InstanceId, member: impl Into<String>, value: Payload) -> Self {
        Self {
            target,
            member: member.into(),
            literal: Some(value),
        }
    }

    /// Checks whether this binding points at the given target member.
    pub fn matches(&self, target: InstanceId, member: &str) -> bool {
        self.target == target && self.member == member
    }
}

/// A pending invocation produced by firing an emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    pub target: InstanceId,
    pub member: String,
    pub payload: Payload,
}

/// A typed event emitter with a persisted listener list.
///
/// The listener list is ordered; removal by index or first-match keeps the
/// remaining order intact.
#[derive(Clone, Debug)]
pub struct EventEmitter {
    kind: EmitterKind,
    listeners: Vec<Binding>,
}

impl EventEmitter {
    /// Creates an emitter of the given kind with no listeners.
    pub fn new(kind: EmitterKind) -> Self {
        Self {
            kind,
            listeners: Vec::new(),
        }
    }

    /// Creates a bang (trigger) emitter.
    pub fn bang() -> Self {
        Self::new(EmitterKind::Bang)
    }

    /// Creates a float emitter.
    pub fn float() -> Self {
        Self::new(EmitterKind::Float)
    }

    /// Creates a 3D vector emitter.
    pub fn vector3() -> Self {
        Self::new(EmitterKind::Vector3)
    }

    /// Creates a rotation emitter.
    pub fn quaternion() -> Self {
        Self::new(EmitterKind::Quaternion)
    }

    /// Creates a color emitter.
    pub fn color() -> Self {
        Self::new(EmitterKind::Color)
    }

    /// Creates an emitter whose payload is outside the wiring type set.
    pub fn opaque() -> Self {
        Self::new(EmitterKind::Opaque)
    }

    /// Returns the emitter's payload class.
    pub fn kind(&self) -> EmitterKind {
        self.kind
    }

    /// The payload type carried by this emitter, or `None` for opaque ones.
    pub fn payload_type(&self) -> Option<PayloadType> {
        self.kind.payload_type()
    }

    /// Returns the persisted listener list.
    pub fn listeners(&self) -> &[Binding] {
        &self.listeners
    }

    /// Returns the number of persisted listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Appends a listener binding.
    pub fn add_listener(&mut self, binding: Binding) {
        self.listeners.push(binding);
    }

    /// Removes the listener at the given index.
    pub fn remove_listener(&mut self, index: usize) -> Option<Binding> {
        if index < self.listeners.len() {
            Some(self.listeners.remove(index))
        } else {
            None
        }
    }

    /// Finds the index of the first listener matching the target member.
    pub fn find_listener(&self, target: InstanceId, member: &str) -> Option<usize> {
        self.listeners.iter().position(|b| b.matches(target, member))
    }

    /// Checks whether any listener points at the given target member.
    pub fn has_listener(&self, target: InstanceId, member: &str) -> bool {
        self.find_listener(target, member).is_some()
    }

    /// Drops every listener whose target is the given instance.
    ///
    /// Returns the number of listeners removed.
    pub fn remove_listeners_to(&mut self, target: InstanceId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|b| b.target != target);
        before - self.listeners.len()
    }

    /// Replaces the whole listener list (used when restoring saved state).
    pub fn set_listeners(&mut self, listeners: Vec<Binding>) {
        self.listeners = listeners;
    }

    /// Resolves the fired value into one delivery per listener.
    ///
    /// A listener with a literal receives the literal; otherwise the fired
    /// value is forwarded. Firing a value that does not match the emitter's
    /// kind is a programming error in the node implementation; it is logged
    /// and produces no deliveries.
    pub fn fire(&self, payload: &Payload) -> Vec<Delivery> {
        if self.kind.payload_type() != Some(payload.payload_type()) {
            warn!(
                kind = ?self.kind,
                fired = ?payload.payload_type(),
                "emitter fired with a mismatched payload; dropping"
            );
            return Vec::new();
        }

        self.listeners
            .iter()
            .map(|binding| Delivery {
                target: binding.target,
                member: binding.member.clone(),
                payload: binding.literal.clone().unwrap_or_else(|| payload.clone()),
            })
            .collect()
    }
}
