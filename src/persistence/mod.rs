//! Persistence module
//!
//! Patch document save/load using serde and JSON. The same document type
//! backs the undo journal's snapshots.

pub mod document;

pub use document::{
    instantiate, load_from_file, save_to_file, snapshot, ConnectionRecord, NodeRecord,
    PatchDocument, PatchError, PATCH_FORMAT_VERSION,
};
