//! Stable positions in the node table
//!
//! Provides [`NodeIndex`], the integer address other nodes use to refer to
//! an entry in the table. Indices are issued sequentially by append and
//! never change meaning once issued.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Position of a node in a [`NodeTable`](crate::NodeTable)
///
/// On the wire an index appears either as a plain integer (the envelope
/// `root`) or as a decimal string (attribute values). [`Display`] and
/// [`FromStr`] implement the decimal-string form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create an index from a raw position
    #[inline]
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    /// Raw position in the table
    #[inline]
    #[must_use]
    pub fn position(self) -> usize {
        self.0
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeIndex {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>()
            .map(Self)
            .map_err(|_| IndexError::NotDecimal(s.to_string()))
    }
}

impl From<usize> for NodeIndex {
    fn from(position: usize) -> Self {
        Self(position)
    }
}

impl From<NodeIndex> for usize {
    fn from(index: NodeIndex) -> Self {
        index.0
    }
}

/// Errors related to node indices
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Value is not a decimal table index
    #[error("not a decimal table index: {0:?}")]
    NotDecimal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_position() {
        let idx = NodeIndex::new(7);
        assert_eq!(idx.position(), 7);
    }

    #[test]
    fn index_display_is_decimal() {
        assert_eq!(NodeIndex::new(42).to_string(), "42");
    }

    #[test]
    fn index_from_str_valid() {
        let idx: NodeIndex = "3".parse().unwrap();
        assert_eq!(idx, NodeIndex::new(3));
    }

    #[test]
    fn index_from_str_rejects_non_decimal() {
        let result: Result<NodeIndex, _> = "x3".parse();
        assert!(matches!(result, Err(IndexError::NotDecimal(_))));
    }

    #[test]
    fn index_from_str_rejects_negative() {
        let result: Result<NodeIndex, _> = "-1".parse();
        assert!(matches!(result, Err(IndexError::NotDecimal(_))));
    }

    #[test]
    fn index_usize_round_trip() {
        let idx = NodeIndex::from(5usize);
        assert_eq!(usize::from(idx), 5);
    }

    #[test]
    fn index_serializes_as_integer() {
        let json = serde_json::to_string(&NodeIndex::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: NodeIndex = serde_json::from_str("9").unwrap();
        assert_eq!(back, NodeIndex::new(9));
    }
}
