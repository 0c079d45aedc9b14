//! Rewrite rules
//!
//! A [`Rule`] is one structural rewrite applied to a visited node. Rules
//! form a closed set of variants with a uniform application signature;
//! rule-specific parameters are construction-time fields, not closures.
//! A rule may mutate any node in the table it is handed — appending new
//! nodes and tombstoning others — but never removes an entry, so indices
//! issued before the rule ran keep their meaning.

use crate::encode::ValueEncoder;
use crate::error::MigrateError;
use uplift_snapshot::{AttrValue, Node, NodeIndex, NodeTable};

/// Where a moved value is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSource {
    /// A named attribute
    Attr(String),

    /// The legacy node-level `global_key` field
    GlobalKey,
}

/// Where a moved value is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveDest {
    /// A named attribute
    Attr(String),

    /// The inline `repr_str` field
    Repr,
}

/// One structural rewrite in a rule chain
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Replace the node's type tag, nothing else
    Rename {
        /// The new tag
        to: String,
    },

    /// Insert a missing attribute with a default value
    ///
    /// When `expect_tag` is set, applying this rule to a node with a
    /// different tag is a fatal [`MigrateError::MalformedNode`] — the
    /// registration, not the data, is wrong.
    FillAttr {
        /// Tag the rule is registered for, enforced when present
        expect_tag: Option<String>,
        /// Attribute to fill
        key: String,
        /// Default value inserted when the key is absent
        value: AttrValue,
    },

    /// Promote an inline scalar attribute to a full node
    ///
    /// The scalar is handed to the [`ValueEncoder`], the resulting node is
    /// appended to the table, and the attribute is rewritten to reference
    /// it. Append-only semantics keep every earlier index valid.
    PromoteAttr {
        /// Attribute holding the scalar
        key: String,
    },

    /// Inline a field from a referenced node, then retire the reference
    ///
    /// Reads `index_key` as a table reference, copies `source_key` from
    /// the referenced node onto this node as `dest_key`, tombstones the
    /// referenced node, and drops `index_key`. The tombstone happens only
    /// after the read.
    InlineFromRef {
        /// Attribute holding the table reference
        index_key: String,
        /// Attribute read from the referenced node
        source_key: String,
        /// Attribute written on the visited node
        dest_key: String,
    },

    /// Relocate a value from one slot to another
    ///
    /// Absent sources are a no-op, matching the conditional legacy-field
    /// cleanups this rule exists for.
    MoveKey {
        /// Where the value is read from
        from: MoveSource,
        /// Where the value is written to
        to: MoveDest,
    },
}

impl Rule {
    /// Replace the type tag
    #[inline]
    #[must_use]
    pub fn rename(to: impl Into<String>) -> Self {
        Self::Rename { to: to.into() }
    }

    /// Insert a missing attribute with a default value
    #[inline]
    #[must_use]
    pub fn fill_attr(key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self::FillAttr {
            expect_tag: None,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Insert a missing attribute, asserting the node's tag first
    #[inline]
    #[must_use]
    pub fn fill_attr_for(
        expect_tag: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        Self::FillAttr {
            expect_tag: Some(expect_tag.into()),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Promote a scalar attribute to an appended node
    #[inline]
    #[must_use]
    pub fn promote_attr(key: impl Into<String>) -> Self {
        Self::PromoteAttr { key: key.into() }
    }

    /// Inline a field from a referenced node and tombstone the source
    #[inline]
    #[must_use]
    pub fn inline_from_ref(
        index_key: impl Into<String>,
        source_key: impl Into<String>,
        dest_key: impl Into<String>,
    ) -> Self {
        Self::InlineFromRef {
            index_key: index_key.into(),
            source_key: source_key.into(),
            dest_key: dest_key.into(),
        }
    }

    /// Relocate a value between attribute slots
    #[inline]
    #[must_use]
    pub fn move_key(from: MoveSource, to: MoveDest) -> Self {
        Self::MoveKey { from, to }
    }

    /// Move the legacy `global_key` field into `repr_str`
    #[inline]
    #[must_use]
    pub fn global_key_to_repr() -> Self {
        Self::MoveKey {
            from: MoveSource::GlobalKey,
            to: MoveDest::Repr,
        }
    }

    /// Apply this rule to the node visited at `index`
    ///
    /// The returned node is what the applicator writes back at `index`.
    /// `table` is the full mutable node table; side effects on it (appends,
    /// tombstones) are visible to later rules in the same chain.
    ///
    /// # Errors
    /// Any structural mismatch between the rule and the node is fatal for
    /// the whole migration; see [`MigrateError`].
    pub fn apply(
        &self,
        index: NodeIndex,
        mut node: Node,
        table: &mut NodeTable,
        encoder: &dyn ValueEncoder,
    ) -> Result<Node, MigrateError> {
        match self {
            Self::Rename { to } => {
                node.set_type_key(to.clone());
                Ok(node)
            }

            Self::FillAttr {
                expect_tag,
                key,
                value,
            } => {
                if let Some(expect) = expect_tag {
                    if node.type_key() != expect.as_str() {
                        return Err(MigrateError::malformed(
                            index.position(),
                            format!(
                                "fill of {key:?} is registered for tag {expect:?}, found {:?}",
                                node.type_key()
                            ),
                        ));
                    }
                }
                if !node.has_attr(key) {
                    node.set_attr(key.clone(), value.clone());
                }
                Ok(node)
            }

            Self::PromoteAttr { key } => {
                let text = match node.attr(key) {
                    Some(AttrValue::Str(s)) => s.clone(),
                    Some(AttrValue::Index(_)) => {
                        return Err(MigrateError::malformed(
                            index.position(),
                            format!("attribute {key:?} is already a table reference"),
                        ));
                    }
                    None => {
                        return Err(MigrateError::malformed(
                            index.position(),
                            format!("missing attribute {key:?}"),
                        ));
                    }
                };

                let child = encoder.encode_str(&text).into_root_node().ok_or_else(|| {
                    MigrateError::malformed(
                        index.position(),
                        format!("encoder fragment root out of bounds for {key:?}"),
                    )
                })?;

                let child_index = table.append(child);
                // Overwriting in place keeps the attribute's wire position.
                node.set_attr(key.clone(), child_index);
                Ok(node)
            }

            Self::InlineFromRef {
                index_key,
                source_key,
                dest_key,
            } => {
                let target = node
                    .attr(index_key)
                    .ok_or_else(|| {
                        MigrateError::malformed(
                            index.position(),
                            format!("missing attribute {index_key:?}"),
                        )
                    })?
                    .as_index()
                    .ok_or_else(|| {
                        MigrateError::malformed(
                            index.position(),
                            format!("attribute {index_key:?} is not a table reference"),
                        )
                    })?;

                let copied = table
                    .get(target)
                    .ok_or(MigrateError::DanglingReference {
                        index: target.position(),
                        len: table.len(),
                    })?
                    .attr(source_key)
                    .cloned()
                    .ok_or_else(|| {
                        MigrateError::malformed(
                            target.position(),
                            format!("referenced node missing attribute {source_key:?}"),
                        )
                    })?;

                node.set_attr(dest_key.clone(), copied);
                node.take_attr(index_key);

                // Tombstone strictly after the read.
                if let Some(source) = table.get_mut(target) {
                    source.tombstone();
                }
                Ok(node)
            }

            Self::MoveKey { from, to } => {
                let value = match from {
                    MoveSource::Attr(key) => node.take_attr(key),
                    MoveSource::GlobalKey => node.take_global_key().map(AttrValue::Str),
                };
                let Some(value) = value else {
                    return Ok(node);
                };
                match to {
                    MoveDest::Attr(key) => node.set_attr(key.clone(), value),
                    MoveDest::Repr => match value {
                        AttrValue::Str(s) => node.set_repr_str(s),
                        AttrValue::Index(_) => {
                            return Err(MigrateError::malformed(
                                index.position(),
                                "cannot move a table reference into repr".to_string(),
                            ));
                        }
                    },
                }
                Ok(node)
            }
        }
    }
}
