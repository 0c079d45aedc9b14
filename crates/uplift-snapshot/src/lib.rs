//! Uplift Snapshot Substrate
//!
//! Data model and codec for serialized IR graph snapshots.
//!
//! # Core Concepts
//!
//! - [`Snapshot`]: the persisted unit — version tag, node table, root reference
//! - [`NodeTable`]: ordered, index-addressed node storage (append-only positions)
//! - [`Node`]: a generic record dispatched on by `type_key`
//! - [`AttrValue`]: attribute payloads — strings, or references into the table
//! - [`NodeIndex`]: a stable integer position in the table
//!
//! Nodes are never physically removed: retiring one means tombstoning it in
//! place (empty `type_key`), so raw index references held by other nodes
//! keep their meaning.
//!
//! # Example
//!
//! ```rust,ignore
//! use uplift_snapshot::Snapshot;
//!
//! let snapshot = Snapshot::from_json(&text)?;
//! println!("version {}", snapshot.version());
//! let root = snapshot.nodes().get(snapshot.root()).unwrap();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod envelope;
mod index;
mod node;
mod table;
mod value;

// Re-exports
pub use envelope::{Snapshot, SnapshotError, VERSION_KEY};
pub use index::{IndexError, NodeIndex};
pub use node::{Node, TOMBSTONE};
pub use table::NodeTable;
pub use value::AttrValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
