//! Uplift Migration Engine
//!
//! Rewrites serialized IR graph snapshots produced by older format
//! versions into the current format, node by node, without re-running the
//! producing compiler.
//!
//! # Core Concepts
//!
//! - [`Rule`]: a closed set of structural rewrites (rename, default-fill,
//!   promote-to-node, cross-reference inline, key move)
//! - [`RuleSet`]: every rule for one version step, keyed by type tag
//! - [`VersionChain`]: the ordered steps from any known version to current
//! - [`ValueEncoder`]: the seam that encodes promoted scalars as nodes
//!
//! Nodes are addressed by stable integer positions in a shared table, and
//! other nodes hold raw index references into it. Every rewrite therefore
//! works append-only: new nodes go at the end, retired nodes are
//! tombstoned in place, and nothing ever shifts.
//!
//! # Example
//!
//! ```rust,ignore
//! use uplift_migrate::VersionChain;
//!
//! let chain = VersionChain::with_defaults();
//! let migrated = chain.migrate_json(&snapshot_text)?;
//! ```
//!
//! Migration either runs every step to completion or fails fatally; on
//! error the partially rewritten snapshot must be discarded, never
//! resumed.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod catalog;
mod chain;
mod encode;
mod error;
mod rule;
mod ruleset;

// Re-exports
pub use chain::VersionChain;
pub use encode::{Fragment, StringEncoder, ValueEncoder, STRING_TYPE_KEY};
pub use error::MigrateError;
pub use rule::{MoveDest, MoveSource, Rule};
pub use ruleset::{RuleSet, RuleSetBuilder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
