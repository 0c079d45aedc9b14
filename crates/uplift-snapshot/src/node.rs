//! Generic node records
//!
//! A [`Node`] is one entry in the node table: a `type_key` dispatch tag, an
//! ordered attribute map, and the legacy inline fields (`repr_str`,
//! `global_key`) some pre-migration node kinds carry instead of a full
//! attribute map. Record keys this crate does not model are carried through
//! a round trip untouched.

use crate::value::AttrValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel `type_key` marking a logically deleted node
///
/// Tombstoned nodes stay in the table so that the indices of every other
/// node keep their meaning; consumers must treat them as absent.
pub const TOMBSTONE: &str = "";

/// One entry in the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Kind tag, used as the rewrite dispatch key
    type_key: String,

    /// Named attribute values, in wire order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    attrs: IndexMap<String, AttrValue>,

    /// Inline representation string used by some legacy node kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repr_str: Option<String>,

    /// Legacy global identity field, retired in favor of `repr_str`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global_key: Option<String>,

    /// Record keys not modeled here, preserved across a round trip
    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

impl Node {
    /// Create a node with the given kind tag and no attributes
    #[must_use]
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            attrs: IndexMap::new(),
            repr_str: None,
            global_key: None,
            extra: IndexMap::new(),
        }
    }

    /// Kind tag
    #[inline]
    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Replace the kind tag
    #[inline]
    pub fn set_type_key(&mut self, type_key: impl Into<String>) {
        self.type_key = type_key.into();
    }

    /// Mark this node as logically deleted
    #[inline]
    pub fn tombstone(&mut self) {
        self.type_key = TOMBSTONE.to_string();
    }

    /// Whether this node is logically deleted
    #[inline]
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.type_key == TOMBSTONE
    }

    /// Look up an attribute value
    #[inline]
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Whether an attribute key is present
    #[inline]
    #[must_use]
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Insert or overwrite an attribute value
    #[inline]
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its value
    #[inline]
    pub fn take_attr(&mut self, key: &str) -> Option<AttrValue> {
        self.attrs.shift_remove(key)
    }

    /// Attribute map, in wire order
    #[inline]
    #[must_use]
    pub fn attrs(&self) -> &IndexMap<String, AttrValue> {
        &self.attrs
    }

    /// Inline representation string
    #[inline]
    #[must_use]
    pub fn repr_str(&self) -> Option<&str> {
        self.repr_str.as_deref()
    }

    /// Set the inline representation string
    #[inline]
    pub fn set_repr_str(&mut self, value: impl Into<String>) {
        self.repr_str = Some(value.into());
    }

    /// Legacy global identity field
    #[inline]
    #[must_use]
    pub fn global_key(&self) -> Option<&str> {
        self.global_key.as_deref()
    }

    /// Remove the legacy global identity field, returning it
    #[inline]
    pub fn take_global_key(&mut self) -> Option<String> {
        self.global_key.take()
    }

    /// Builder-style attribute insertion
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style representation string
    #[inline]
    #[must_use]
    pub fn with_repr_str(mut self, value: impl Into<String>) -> Self {
        self.repr_str = Some(value.into());
        self
    }

    /// Builder-style legacy global key
    #[inline]
    #[must_use]
    pub fn with_global_key(mut self, value: impl Into<String>) -> Self {
        self.global_key = Some(value.into());
        self
    }
}
