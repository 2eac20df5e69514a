//! Wiring module
//!
//! The runtime node model: payload types, slot definitions, event emitters
//! with persisted bindings, the WiringNode trait, the link binder, and the
//! node type registry.

pub mod binder;
mod emitter;
mod node;
mod payload;
mod registry;
mod slot;

pub use emitter::{Binding, Delivery, EmitterKind, EventEmitter, InstanceId};
pub use node::{EmissionSink, NodeCategory, NodeError, NodeInfo, WiringNode};
pub use payload::{Color, Payload, PayloadType};
pub use registry::{NodeFactory, NodeRegistry};
pub use slot::{InletDefinition, OutletDefinition};
