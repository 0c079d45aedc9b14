//! The version chain driver
//!
//! A [`VersionChain`] is a totally ordered sequence of version steps, one
//! [`RuleSet`] per adjacent version pair. Given a snapshot's declared
//! version it finds the unique step whose source version is a prefix of
//! the declared string, then runs every step from there through the
//! terminal version in order — later steps assume the structural shape
//! produced by earlier ones, so steps are never skipped or reordered.
//! Downgrades are unsupported; there is no path backward.
//!
//! Chains are explicit immutable values built at startup and passed in;
//! there is no ambient registry.

use crate::catalog;
use crate::encode::{StringEncoder, ValueEncoder};
use crate::error::MigrateError;
use crate::ruleset::RuleSet;
use uplift_snapshot::Snapshot;

/// An ordered chain of version steps ending at the current format
#[derive(Debug)]
pub struct VersionChain {
    steps: Vec<RuleSet>,
    encoder: Box<dyn ValueEncoder>,
}

impl VersionChain {
    /// Build a chain from ordered steps
    ///
    /// # Errors
    /// Returns [`MigrateError::EmptyChain`] for no steps and
    /// [`MigrateError::DiscontiguousChain`] when a step's source version
    /// is not the previous step's target.
    pub fn new(steps: Vec<RuleSet>) -> Result<Self, MigrateError> {
        if steps.is_empty() {
            return Err(MigrateError::EmptyChain);
        }
        for pair in steps.windows(2) {
            if pair[1].from_version() != pair[0].to_version() {
                return Err(MigrateError::DiscontiguousChain {
                    from: pair[1].from_version().to_string(),
                    to: pair[1].to_version().to_string(),
                    prev: pair[0].to_version().to_string(),
                });
            }
        }
        Ok(Self {
            steps,
            encoder: Box::new(StringEncoder),
        })
    }

    /// The built-in chain covering every historical format version
    #[must_use]
    pub fn with_defaults() -> Self {
        // The catalog is a fixed contiguous sequence; contiguity is
        // covered by catalog tests.
        Self {
            steps: catalog::default_steps(),
            encoder: Box::new(StringEncoder),
        }
    }

    /// Swap the value encoder used by promotion rules
    #[must_use]
    pub fn with_encoder(mut self, encoder: impl ValueEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// The chain's steps in version order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[RuleSet] {
        &self.steps
    }

    /// The terminal version every migration ends at
    #[inline]
    #[must_use]
    pub fn terminal_version(&self) -> &str {
        // Non-empty by construction; with_defaults ships a fixed catalog.
        self.steps
            .last()
            .map(RuleSet::to_version)
            .unwrap_or_default()
    }

    /// Migrate a snapshot in place to the terminal version
    ///
    /// A snapshot already at the terminal version is left untouched.
    ///
    /// # Errors
    /// Returns [`MigrateError::UnknownSourceVersion`] when the declared
    /// version matches no step, or any step failure. On error the snapshot
    /// is inconsistently mutated and must be discarded — appends and
    /// tombstones are not transactional, so resumption is unsafe.
    pub fn migrate(&self, snapshot: &mut Snapshot) -> Result<(), MigrateError> {
        let declared = snapshot.version().to_string();
        if declared.starts_with(self.terminal_version()) {
            tracing::debug!("Snapshot already at current version {}", declared);
            return Ok(());
        }

        let start = self
            .steps
            .iter()
            .position(|step| declared.starts_with(step.from_version()))
            .ok_or_else(|| MigrateError::UnknownSourceVersion(declared.clone()))?;

        tracing::info!(
            "Migrating snapshot from {} to {} ({} steps)",
            declared,
            self.terminal_version(),
            self.steps.len() - start
        );
        for step in &self.steps[start..] {
            step.apply(snapshot, self.encoder.as_ref())?;
        }
        Ok(())
    }

    /// Migrate a serialized envelope, returning the re-serialized result
    ///
    /// This is the whole-pipeline entry point: decode, migrate, encode.
    /// No output is produced on failure.
    ///
    /// # Errors
    /// Envelope decode/encode failures and every [`Self::migrate`] error.
    pub fn migrate_json(&self, text: &str) -> Result<String, MigrateError> {
        let mut snapshot = Snapshot::from_json(text)?;
        self.migrate(&mut snapshot)?;
        Ok(snapshot.to_json()?)
    }
}
