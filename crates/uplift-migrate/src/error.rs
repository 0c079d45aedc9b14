//! Error types for snapshot migration
//!
//! Every migration failure is structural and unrecoverable for the
//! in-progress call: a half-migrated graph cannot safely be interpreted by
//! either the old or the new consumer, so there is no partial-success mode
//! and nothing is retried internally. Callers must discard the mutated
//! snapshot on error.

use uplift_snapshot::SnapshotError;

/// Migration error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Declared version matches no known source version
    #[error("cannot update from version {0}")]
    UnknownSourceVersion(String),

    /// A rule met a node shape it was not registered for
    ///
    /// Signals an upstream producer or rule-registration bug, not a
    /// recoverable data issue.
    #[error("malformed node at index {index}: {reason}")]
    MalformedNode {
        /// Table position of the offending node
        index: usize,
        /// What the rule expected and did not find
        reason: String,
    },

    /// A reference points outside the current table bounds
    #[error("dangling reference: index {index} out of bounds (table length {len})")]
    DanglingReference {
        /// The out-of-bounds reference
        index: usize,
        /// Table length at the time of the check
        len: usize,
    },

    /// A reference resolves to a logically deleted node
    #[error("dangling reference: index {index} resolves to a tombstoned node")]
    TombstonedReference {
        /// The reference whose target is tombstoned
        index: usize,
    },

    /// Rule-set steps do not form a contiguous version chain
    #[error("discontiguous version chain: step {from} -> {to} does not extend {prev}")]
    DiscontiguousChain {
        /// Source version of the offending step
        from: String,
        /// Target version of the offending step
        to: String,
        /// Target version of the preceding step
        prev: String,
    },

    /// A version chain must contain at least one step
    #[error("version chain has no steps")]
    EmptyChain,

    /// Envelope decode/encode failure
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl MigrateError {
    /// Shorthand for a [`MigrateError::MalformedNode`]
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            index,
            reason: reason.into(),
        }
    }
}
