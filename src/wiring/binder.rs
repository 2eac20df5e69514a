//! The link binder: translates abstract edges into persisted bindings.
//!
//! Connecting an outlet to an inlet means appending a listener record to the
//! outlet's emitter; disconnecting means removing it again. The binder is
//! the strict half of the type system: the compatibility check is permissive
//! about bang outlets, the binder decides exactly which bindings exist.

use tracing::debug;

use super::emitter::{Binding, EventEmitter, InstanceId};
use super::payload::{Payload, PayloadType};
use super::slot::InletDefinition;

/// The sentinel value sent to a float inlet driven by a bang outlet.
pub const BANG_FLOAT_SENTINEL: f32 = 1.0;

/// Tries to persist a binding from an emitter to a target inlet.
///
/// Returns false and makes no change when the pairing has no defined
/// dispatch shape:
/// - opaque emitters refuse everything;
/// - a bang emitter binds to trigger inlets (void invocation) and to float
///   inlets (fixed sentinel argument), nothing else;
/// - data-carrying emitters bind only to inlets of the exact same type,
///   forwarding the fired value.
pub fn bind(emitter: &mut EventEmitter, target: InstanceId, inlet: &InletDefinition) -> bool {
    let binding = match emitter.payload_type() {
        None => return false,
        Some(PayloadType::Bang) => match inlet.payload {
            PayloadType::Bang => Binding::forward(target, inlet.member),
            PayloadType::Float => Binding::literal(
                target,
                inlet.member,
                Payload::Float(BANG_FLOAT_SENTINEL),
            ),
            // No sentinel is defined for the remaining types.
            _ => return false,
        },
        Some(kind) => {
            if inlet.payload != kind {
                return false;
            }
            Binding::forward(target, inlet.member)
        }
    };

    debug!(target_id = target, member = inlet.member, "binding persisted");
    emitter.add_listener(binding);
    true
}

/// Removes the first persisted binding matching the target member.
///
/// If the same (target, member) pair is bound more than once, only the
/// first occurrence is removed; the remaining duplicates are left intact.
/// Returns false if no binding matched.
pub fn unbind(emitter: &mut EventEmitter, target: InstanceId, member: &str) -> bool {
    match emitter.find_listener(target, member) {
        Some(index) => {
            emitter.remove_listener(index);
            debug!(target_id = target, member, "binding removed");
            true
        }
        None => false,
    }
}
