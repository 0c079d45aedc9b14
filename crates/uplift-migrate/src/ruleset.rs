//! Per-version rule sets and the applicator pass
//!
//! A [`RuleSet`] holds every rewrite registered for one version step
//! `(from, to)`: a mapping from type tag to an ordered rule chain.
//! Building one is pure — no I/O, no dependency on the snapshot being
//! migrated — so rule sets are plain immutable configuration values.
//!
//! [`RuleSet::apply`] is the applicator: a single pass over the node table
//! whose length is captured once at the start. Nodes appended by rules
//! during the pass are deliberately not visited — they are already in
//! current format and become input to the next version step. The pass ends
//! by validating reference integrity and stamping the step's target
//! version.

use crate::encode::ValueEncoder;
use crate::error::MigrateError;
use crate::rule::Rule;
use indexmap::IndexMap;
use uplift_snapshot::{AttrValue, NodeIndex, Snapshot};

/// All rewrite rules for one version step
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    from: String,
    to: String,
    rules: IndexMap<String, Vec<Rule>>,
}

impl RuleSet {
    /// Start building a rule set for the step `from -> to`
    #[must_use]
    pub fn builder(from: impl Into<String>, to: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            from: from.into(),
            to: to.into(),
            rules: IndexMap::new(),
        }
    }

    /// Source version prefix this step accepts
    #[inline]
    #[must_use]
    pub fn from_version(&self) -> &str {
        &self.from
    }

    /// Version stamped once the step has run
    #[inline]
    #[must_use]
    pub fn to_version(&self) -> &str {
        &self.to
    }

    /// Rule chain registered for a type tag
    #[inline]
    #[must_use]
    pub fn rules_for(&self, tag: &str) -> Option<&[Rule]> {
        self.rules.get(tag).map(Vec::as_slice)
    }

    /// Number of type tags with registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run this version step over a snapshot
    ///
    /// Iterates table positions `0..len`, with `len` captured before the
    /// pass. For each visited node the chain registered for its tag at
    /// visit time runs left to right; every link receives the previous
    /// link's output node and the same mutable table, then the result is
    /// written back at the visited position. Unregistered tags pass
    /// through untouched.
    ///
    /// # Errors
    /// Fails fatally on a declared version outside this step's source
    /// prefix, on any rule/node shape mismatch, or if a reference produced
    /// by the step fails the end-of-step integrity check. The snapshot
    /// must be discarded on error.
    pub fn apply(
        &self,
        snapshot: &mut Snapshot,
        encoder: &dyn ValueEncoder,
    ) -> Result<(), MigrateError> {
        if !snapshot.version().starts_with(&self.from) {
            return Err(MigrateError::UnknownSourceVersion(
                snapshot.version().to_string(),
            ));
        }

        let len = snapshot.nodes().len();
        tracing::debug!(
            "Applying version step {} -> {} over {} nodes",
            self.from,
            self.to,
            len
        );

        let mut rewritten = 0usize;
        for position in 0..len {
            let index = NodeIndex::new(position);
            let Some(node) = snapshot.nodes().get(index).cloned() else {
                continue;
            };
            let Some(chain) = self.rules.get(node.type_key()) else {
                continue;
            };

            let mut node = node;
            for rule in chain {
                node = rule.apply(index, node, snapshot.nodes_mut(), encoder)?;
            }
            snapshot.nodes_mut().replace(index, node);
            rewritten += 1;
        }

        check_integrity(snapshot)?;

        tracing::debug!(
            "Version step {} -> {} complete: {} rewritten, {} appended",
            self.from,
            self.to,
            rewritten,
            snapshot.nodes().len() - len
        );
        snapshot.set_version(self.to.clone());
        Ok(())
    }
}

/// Validate every reference the migration produced, plus the root
///
/// Typed `Index` values only exist where a rule wrote one, so this is
/// exactly the set of references the step is answerable for; legacy
/// decimal strings from the producer are out of reach by construction.
/// References held by tombstoned nodes are skipped — those nodes are
/// logically absent.
fn check_integrity(snapshot: &Snapshot) -> Result<(), MigrateError> {
    let table = snapshot.nodes();
    let len = table.len();

    if !table.contains(snapshot.root()) {
        return Err(MigrateError::DanglingReference {
            index: snapshot.root().position(),
            len,
        });
    }

    for (_, node) in table.iter_indexed() {
        if node.is_tombstone() {
            continue;
        }
        for value in node.attrs().values() {
            let AttrValue::Index(target) = value else {
                continue;
            };
            match table.get(*target) {
                None => {
                    return Err(MigrateError::DanglingReference {
                        index: target.position(),
                        len,
                    });
                }
                Some(referenced) if referenced.is_tombstone() => {
                    return Err(MigrateError::TombstonedReference {
                        index: target.position(),
                    });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Builder for [`RuleSet`]
#[derive(Debug)]
pub struct RuleSetBuilder {
    from: String,
    to: String,
    rules: IndexMap<String, Vec<Rule>>,
}

impl RuleSetBuilder {
    /// Register one rule for a tag, appended to any existing chain
    #[must_use]
    pub fn rule(mut self, tag: impl Into<String>, rule: Rule) -> Self {
        self.rules.entry(tag.into()).or_default().push(rule);
        self
    }

    /// Register an ordered rule chain for a tag
    #[must_use]
    pub fn rules(mut self, tag: impl Into<String>, chain: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.entry(tag.into()).or_default().extend(chain);
        self
    }

    /// Finish the rule set
    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet {
            from: self.from,
            to: self.to,
            rules: self.rules,
        }
    }
}
