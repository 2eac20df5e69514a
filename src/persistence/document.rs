//! Patch document serialization for save/load functionality.
//!
//! A document captures the complete state of a patch: every node with its
//! type, name, position and private state, plus every persisted binding
//! (including literal arguments). Documents are also what the undo journal
//! snapshots, so a round trip through this module must be lossless.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::patcher::Patch;
use crate::wiring::{Binding, InstanceId, NodeError, NodeRegistry, Payload};

/// Current patch document format version.
/// Increment this when making breaking changes to the format.
pub const PATCH_FORMAT_VERSION: u32 = 1;

/// A complete serialized patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchDocument {
    /// Human-readable name for the patch.
    pub name: String,
    /// Document format version for future compatibility.
    pub version: u32,
    /// All nodes in the patch, in hierarchy order.
    pub nodes: Vec<NodeRecord>,
    /// All persisted bindings.
    pub connections: Vec<ConnectionRecord>,
}

impl PatchDocument {
    /// Creates a new empty document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: PATCH_FORMAT_VERSION,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Checks if this document version is readable by the current format.
    pub fn is_compatible(&self) -> bool {
        self.version <= PATCH_FORMAT_VERSION
    }
}

/// Serialized data for a single node instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stable instance id, referenced by connections.
    pub id: InstanceId,
    /// Node type identifier (e.g. "filter.float"); must match a registered
    /// type on load.
    pub type_id: String,
    /// Instance display name.
    pub name: String,
    /// Canvas position (x, y).
    pub position: (f32, f32),
    /// Node-specific state, if the node has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<serde_json::Value>,
}

/// Serialized data for one persisted binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Source instance id.
    pub from_node: InstanceId,
    /// Emitter member name on the source.
    pub from_member: String,
    /// Target instance id.
    pub to_node: InstanceId,
    /// Inlet member name on the target.
    pub to_member: String,
    /// Literal argument, for bindings that send a fixed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Payload>,
}

/// Error type for patch document operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// File I/O error.
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The document was written by a newer format.
    #[error("incompatible patch version: found {found}, expected <= {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },
    /// A node record names a type the registry does not know.
    #[error("unknown node type: {0}")]
    UnknownNodeType(String),
    /// Two node records share an instance id.
    #[error("duplicate instance id: {0}")]
    DuplicateInstanceId(InstanceId),
    /// A node refused its saved state.
    #[error("node {id}: {source}")]
    NodeState {
        id: InstanceId,
        #[source]
        source: NodeError,
    },
}

/// Captures the complete state of a patch into a document.
pub fn snapshot(patch: &Patch, name: impl Into<String>) -> PatchDocument {
    let mut doc = PatchDocument::new(name);

    for (id, node_name, position, node) in patch.iter() {
        doc.nodes.push(NodeRecord {
            id,
            type_id: node.info().id.to_string(),
            name: node_name.to_string(),
            position: (position.x, position.y),
            state: node.serialize_state(),
        });

        for outlet in node.outlets() {
            let Some(emitter) = node.emitter(outlet.member) else {
                continue;
            };
            for binding in emitter.listeners() {
                doc.connections.push(ConnectionRecord {
                    from_node: id,
                    from_member: outlet.member.to_string(),
                    to_node: binding.target,
                    to_member: binding.member.clone(),
                    literal: binding.literal.clone(),
                });
            }
        }
    }

    doc
}

/// Rebuilds a patch from a document.
///
/// Instance ids are restored exactly, since bindings refer to them.
/// Bindings are restored verbatim, including orphans whose target is not
/// in the document; they stay dormant until a cleanup pass, matching the
/// live semantics. Bindings naming an emitter that no longer exists on the
/// node type are skipped with a warning.
pub fn instantiate(doc: &PatchDocument, registry: &NodeRegistry) -> Result<Patch, PatchError> {
    if !doc.is_compatible() {
        return Err(PatchError::IncompatibleVersion {
            found: doc.version,
            expected: PATCH_FORMAT_VERSION,
        });
    }

    let mut patch = Patch::new();

    for record in &doc.nodes {
        let mut node = registry
            .create(&record.type_id)
            .ok_or_else(|| PatchError::UnknownNodeType(record.type_id.clone()))?;

        if let Some(state) = &record.state {
            node.deserialize_state(state)
                .map_err(|source| PatchError::NodeState {
                    id: record.id,
                    source,
                })?;
        }

        let position = glam::Vec2::new(record.position.0, record.position.1);
        if !patch.add_node_with_id(record.id, record.name.clone(), position, node) {
            return Err(PatchError::DuplicateInstanceId(record.id));
        }
    }

    for conn in &doc.connections {
        let Some(emitter) = patch
            .node_mut(conn.from_node)
            .and_then(|n| n.emitter_mut(&conn.from_member))
        else {
            warn!(
                from = conn.from_node,
                member = %conn.from_member,
                "connection names a missing emitter; skipped"
            );
            continue;
        };
        emitter.add_listener(Binding {
            target: conn.to_node,
            member: conn.to_member.clone(),
            literal: conn.literal.clone(),
        });
    }

    Ok(patch)
}

/// Saves a document to a JSON file.
pub fn save_to_file(doc: &PatchDocument, path: &Path) -> Result<(), PatchError> {
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads a document from a JSON file.
pub fn load_from_file(path: &Path) -> Result<PatchDocument, PatchError> {
    let json = std::fs::read_to_string(path)?;
    let doc: PatchDocument = serde_json::from_str(&json)?;

    if !doc.is_compatible() {
        return Err(PatchError::IncompatibleVersion {
            found: doc.version,
            expected: PATCH_FORMAT_VERSION,
        });
    }

    Ok(doc)
}
