//! Patcher module
//!
//! The editor-side model: node descriptors scanned from instances, the
//! patch container, the graph of derived edges, the drag-to-connect
//! interaction machine, the undo journal, and the editor session tying
//! them together.

mod descriptor;
mod graph;
mod interaction;
mod patch;
mod session;
mod undo;

#[cfg(test)]
pub(crate) mod testing;

pub use descriptor::{nicify_member_name, Inlet, NodeDescriptor, Outlet};
pub use graph::{Edge, EdgeId, Graph, InletRef, OutletRef};
pub use interaction::{DragState, GestureOutcome, Interaction, SlotAddr, SlotLayout};
pub use patch::Patch;
pub use session::{ClipboardEntry, EditorSession};
pub use undo::{UndoEntry, UndoStack};
