//! Editor-side node descriptors.
//!
//! A descriptor is a cheap, immutable snapshot of one node instance's
//! connectable surface: its identity, display name, and scanned inlet and
//! outlet slots. Descriptors are rebuilt wholesale on every rescan and never
//! mutated in place, so stale slot data cannot survive a hierarchy edit.

use glam::Vec2;
use tracing::warn;

use crate::wiring::{InstanceId, PayloadType, WiringNode};

/// Editor representation of a node inlet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inlet {
    /// The member name the binding targets.
    pub member: &'static str,
    /// The payload type this inlet accepts.
    pub payload: PayloadType,
    /// Human-readable label derived from the member name.
    pub label: String,
}

/// Editor representation of a node outlet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outlet {
    /// The emitter member name.
    pub member: &'static str,
    /// The payload type carried by the emitter, or `None` when the emitter
    /// is opaque. Opaque outlets are displayed but refuse all connections.
    pub payload: Option<PayloadType>,
    /// Human-readable label derived from the member name, with a trailing
    /// "Event" suffix stripped.
    pub label: String,
}

/// A snapshot of one node instance as seen by the editor.
#[derive(Clone, Debug)]
pub struct NodeDescriptor {
    /// Stable identity of the underlying instance.
    pub id: InstanceId,
    /// Name shown on the node box.
    pub display_name: String,
    /// The node type's human-readable name.
    pub type_name: &'static str,
    /// Scanned inlets, in declaration order.
    pub inlets: Vec<Inlet>,
    /// Scanned outlets, in declaration order.
    pub outlets: Vec<Outlet>,
    /// Node position in the patcher canvas at scan time.
    pub position: Vec2,
}

impl NodeDescriptor {
    /// Scans a node instance into a descriptor.
    ///
    /// The scan is a pure read: declaration order is preserved, duplicate
    /// inlet members beyond the first are omitted, and declared outlets
    /// whose emitter does not resolve are omitted. An instance with no
    /// slots at all still produces a valid (empty) descriptor.
    pub fn scan(id: InstanceId, name: &str, position: Vec2, node: &dyn WiringNode) -> Self {
        let type_name = node.info().name;

        let mut inlets: Vec<Inlet> = Vec::new();
        for def in node.inlets() {
            if inlets.iter().any(|i| i.member == def.member) {
                warn!(member = def.member, node = type_name, "duplicate inlet omitted");
                continue;
            }
            inlets.push(Inlet {
                member: def.member,
                payload: def.payload,
                label: nicify_member_name(def.member),
            });
        }

        let mut outlets: Vec<Outlet> = Vec::new();
        for def in node.outlets() {
            let Some(emitter) = node.emitter(def.member) else {
                warn!(member = def.member, node = type_name, "unresolved outlet omitted");
                continue;
            };
            outlets.push(Outlet {
                member: def.member,
                payload: emitter.payload_type(),
                label: outlet_display_name(def.member),
            });
        }

        Self {
            id,
            display_name: display_name(name, type_name),
            type_name,
            inlets,
            outlets,
            position,
        }
    }

    /// Looks up an inlet by member name.
    pub fn inlet(&self, member: &str) -> Option<&Inlet> {
        self.inlets.iter().find(|i| i.member == member)
    }

    /// Looks up an outlet by member name.
    pub fn outlet(&self, member: &str) -> Option<&Outlet> {
        self.outlets.iter().find(|o| o.member == member)
    }
}

/// Builds the node box title from the instance and type names.
fn display_name(instance_name: &str, type_name: &str) -> String {
    if instance_name == type_name {
        type_name.to_string()
    } else {
        format!("{} ({})", instance_name, type_name)
    }
}

/// Turns a snake_case member name into a display label.
///
/// Leading underscores are dropped and each word is capitalized:
/// `_output_event` becomes "Output Event".
pub fn nicify_member_name(member: &str) -> String {
    member
        .trim_start_matches('_')
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display label for an outlet: nicified, with a trailing "Event" dropped.
fn outlet_display_name(member: &str) -> String {
    let label = nicify_member_name(member);
    match label.strip_suffix(" Event") {
        Some(stripped) => stripped.to_string(),
        None => label,
    }
}
