//! The snapshot envelope
//!
//! Provides [`Snapshot`], the top-level persisted unit: a declared format
//! version, the node table, and the root reference identifying the entry
//! point. Envelope keys this crate does not model (auxiliary payloads
//! attached by producers) survive a decode/encode round trip untouched.

use crate::index::NodeIndex;
use crate::table::NodeTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Envelope key holding the declared format version
pub const VERSION_KEY: &str = "ir_version";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct EnvelopeAttrs {
    #[serde(rename = "ir_version")]
    version: String,

    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

/// A serialized IR graph plus its declared format version
///
/// A snapshot is read once, mutated in place through zero or more version
/// steps, then written out. `root` is never changed by migration and must
/// stay a valid table index throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    root: NodeIndex,

    nodes: NodeTable,

    attrs: EnvelopeAttrs,

    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Build a snapshot from parts
    ///
    /// # Errors
    /// Returns [`SnapshotError::RootOutOfBounds`] if `root` does not fall
    /// inside `nodes`.
    pub fn new(
        version: impl Into<String>,
        nodes: NodeTable,
        root: NodeIndex,
    ) -> Result<Self, SnapshotError> {
        let snapshot = Self {
            root,
            nodes,
            attrs: EnvelopeAttrs {
                version: version.into(),
                extra: IndexMap::new(),
            },
            extra: IndexMap::new(),
        };
        snapshot.check_root()?;
        Ok(snapshot)
    }

    /// Decode a snapshot from its serialized envelope
    ///
    /// # Errors
    /// Returns [`SnapshotError::Decode`] on malformed input and
    /// [`SnapshotError::RootOutOfBounds`] if the envelope's root reference
    /// does not fall inside its node table.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(text).map_err(SnapshotError::Decode)?;
        snapshot.check_root()?;
        Ok(snapshot)
    }

    /// Re-encode the envelope
    ///
    /// Output is pretty-printed; the exact formatting is a presentation
    /// detail.
    ///
    /// # Errors
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Encode)
    }

    /// Declared format version
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.attrs.version
    }

    /// Stamp a new format version
    #[inline]
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.attrs.version = version.into();
    }

    /// Entry-point reference into the node table
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The node table
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Mutable access to the node table
    #[inline]
    #[must_use]
    pub fn nodes_mut(&mut self) -> &mut NodeTable {
        &mut self.nodes
    }

    fn check_root(&self) -> Result<(), SnapshotError> {
        if self.nodes.contains(self.root) {
            Ok(())
        } else {
            Err(SnapshotError::RootOutOfBounds {
                root: self.root.position(),
                len: self.nodes.len(),
            })
        }
    }
}

/// Errors related to the snapshot envelope
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Input is not a well-formed envelope
    #[error("malformed snapshot envelope: {0}")]
    Decode(#[source] serde_json::Error),

    /// Envelope could not be re-serialized
    #[error("failed to serialize snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Root reference falls outside the node table
    #[error("root index {root} out of bounds (table length {len})")]
    RootOutOfBounds { root: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use pretty_assertions::assert_eq;

    fn sample_text() -> &'static str {
        r#"{
            "root": 1,
            "nodes": [
                {"type_key": ""},
                {"type_key": "Variable", "attrs": {"name": "x"}}
            ],
            "attrs": {"ir_version": "0.6.0"}
        }"#
    }

    #[test]
    fn snapshot_decode_reads_envelope() {
        let snapshot = Snapshot::from_json(sample_text()).unwrap();
        assert_eq!(snapshot.version(), "0.6.0");
        assert_eq!(snapshot.root(), NodeIndex::new(1));
        assert_eq!(snapshot.nodes().len(), 2);
        assert_eq!(snapshot.nodes().get(snapshot.root()).unwrap().type_key(), "Variable");
    }

    #[test]
    fn snapshot_decode_rejects_out_of_bounds_root() {
        let text = r#"{"root": 5, "nodes": [{"type_key": "A"}], "attrs": {"ir_version": "0.6.0"}}"#;
        let result = Snapshot::from_json(text);
        assert!(matches!(
            result,
            Err(SnapshotError::RootOutOfBounds { root: 5, len: 1 })
        ));
    }

    #[test]
    fn snapshot_decode_rejects_garbage() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn snapshot_new_checks_root() {
        let table = NodeTable::from(vec![Node::new("A")]);
        assert!(Snapshot::new("0.6", table.clone(), NodeIndex::new(0)).is_ok());
        assert!(matches!(
            Snapshot::new("0.6", table, NodeIndex::new(1)),
            Err(SnapshotError::RootOutOfBounds { .. })
        ));
    }

    #[test]
    fn snapshot_round_trip_preserves_unknown_envelope_keys() {
        let text = r#"{
            "root": 0,
            "nodes": [{"type_key": "A"}],
            "attrs": {"ir_version": "0.6.0", "producer": "frontend"},
            "b64ndarrays": ["AAAA"]
        }"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        let encoded = snapshot.to_json().unwrap();
        let reparsed = Snapshot::from_json(&encoded).unwrap();

        assert_eq!(snapshot, reparsed);
        assert!(encoded.contains("b64ndarrays"));
        assert!(encoded.contains("producer"));
    }

    #[test]
    fn snapshot_set_version() {
        let mut snapshot = Snapshot::from_json(sample_text()).unwrap();
        snapshot.set_version("0.9");
        assert_eq!(snapshot.version(), "0.9");
        assert!(snapshot.to_json().unwrap().contains(r#""ir_version": "0.9""#));
    }
}
