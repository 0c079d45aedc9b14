//! Built-in version catalog
//!
//! The rule sets for every historical snapshot format, one per adjacent
//! version pair: `0.6 -> 0.7 -> 0.8 -> 0.9`. These are configuration, not
//! engine logic — each function builds a plain [`RuleSet`] value and has no
//! dependency on any snapshot.

use crate::rule::Rule;
use crate::ruleset::RuleSet;

/// Current snapshot format version
pub const CURRENT_VERSION: &str = "0.9";

/// Tags renamed wholesale into their 0.7 namespaces
const RENAMES_06_TO_07: &[(&str, &str)] = &[
    // Types
    ("graph.Type", "ty.Type"),
    ("graph.TupleType", "ty.TupleType"),
    ("graph.TypeConstraint", "ty.TypeConstraint"),
    ("graph.FuncType", "ty.FuncType"),
    ("graph.IncompleteType", "ty.IncompleteType"),
    ("graph.TypeRelation", "ty.TypeRelation"),
    ("graph.TypeCall", "ty.TypeCall"),
    // Base IR
    ("graph.Module", "ir.Module"),
    ("graph.SourceName", "SourceName"),
    ("graph.Span", "Span"),
    ("graph.Pass", "transform.Pass"),
    ("graph.PassInfo", "transform.PassInfo"),
    ("graph.PassContext", "transform.PassContext"),
    ("graph.ModulePass", "transform.ModulePass"),
    ("graph.Sequential", "transform.Sequential"),
    ("StrMap", "Map"),
    // Expressions
    ("Cast", "expr.Cast"),
    ("Add", "expr.Add"),
    ("Sub", "expr.Sub"),
    ("Mul", "expr.Mul"),
    ("Div", "expr.Div"),
    ("Mod", "expr.Mod"),
    ("FloorDiv", "expr.FloorDiv"),
    ("FloorMod", "expr.FloorMod"),
    ("Min", "expr.Min"),
    ("Max", "expr.Max"),
    ("EQ", "expr.EQ"),
    ("NE", "expr.NE"),
    ("LT", "expr.LT"),
    ("LE", "expr.LE"),
    ("GT", "expr.GT"),
    ("GE", "expr.GE"),
    ("And", "expr.And"),
    ("Or", "expr.Or"),
    ("Not", "expr.Not"),
    ("Select", "expr.Select"),
    ("Ramp", "expr.Ramp"),
    ("Broadcast", "expr.Broadcast"),
    ("Shuffle", "expr.Shuffle"),
    ("Let", "expr.Let"),
    ("Any", "expr.Any"),
    ("BufferLoad", "expr.BufferLoad"),
    // Statements
    ("LetStmt", "stmt.LetStmt"),
    ("AssertStmt", "stmt.AssertStmt"),
    ("BufferStore", "stmt.BufferStore"),
    ("BufferRealize", "stmt.BufferRealize"),
    ("Allocate", "stmt.Allocate"),
    ("IfThenElse", "stmt.IfThenElse"),
    ("Evaluate", "stmt.Evaluate"),
    ("Prefetch", "stmt.Prefetch"),
];

/// Tags gaining a default `span` attribute in 0.9
const SPAN_TAGS_08_TO_09: &[&str] = &[
    "GlobalVar",
    "expr.Var",
    "expr.Call",
    "expr.Let",
    "ir.Module",
    "expr.StringImm",
    "expr.BufferLoad",
    "stmt.LetStmt",
    "stmt.AttrStmt",
    "stmt.IfThenElse",
];

/// The namespacing migration: legacy un-prefixed and `graph.`-prefixed
/// tags move into `expr.`/`stmt.`/`ty.`/`transform.` namespaces, inline
/// name strings are promoted to `rt.String` nodes, and the node-level
/// `global_key` field is retired in favor of `repr_str`.
#[must_use]
pub fn step_06_to_07() -> RuleSet {
    let mut builder = RuleSet::builder("0.6", "0.7");
    for (old, new) in RENAMES_06_TO_07 {
        builder = builder.rule(*old, Rule::rename(*new));
    }
    builder
        .rule("SourceName", Rule::global_key_to_repr())
        .rule("EnvFunc", Rule::global_key_to_repr())
        .rules("graph.Op", [Rule::global_key_to_repr(), Rule::rename("Op")])
        // Type variables stored their binder as a raw table reference; the
        // name is inlined and the binder node retired.
        .rules(
            "graph.TypeVar",
            [
                Rule::inline_from_ref("var", "name", "name_hint"),
                Rule::rename("TypeVar"),
                Rule::promote_attr("name_hint"),
            ],
        )
        .rule("TypeVar", Rule::promote_attr("name_hint"))
        .rules(
            "graph.GlobalTypeVar",
            [
                Rule::inline_from_ref("var", "name", "name_hint"),
                Rule::rename("GlobalTypeVar"),
                Rule::promote_attr("name_hint"),
            ],
        )
        .rule("GlobalTypeVar", Rule::promote_attr("name_hint"))
        .rules("graph.Id", [Rule::rename("Id"), Rule::promote_attr("name_hint")])
        .rule("ty.Constructor", Rule::promote_attr("name_hint"))
        .rules(
            "graph.GlobalVar",
            [Rule::rename("GlobalVar"), Rule::promote_attr("name_hint")],
        )
        .rule("GlobalVar", Rule::promote_attr("name_hint"))
        .rules(
            "Variable",
            [
                Rule::rename("expr.Var"),
                Rule::fill_attr("type_annotation", "0"),
                Rule::promote_attr("name"),
            ],
        )
        .rules(
            "SizeVar",
            [
                Rule::rename("expr.SizeVar"),
                Rule::fill_attr("type_annotation", "0"),
                Rule::promote_attr("name"),
            ],
        )
        .rules(
            "StringImm",
            [Rule::rename("expr.StringImm"), Rule::promote_attr("value")],
        )
        .rules("Call", [Rule::rename("expr.Call"), Rule::promote_attr("name")])
        .rules(
            "AttrStmt",
            [Rule::rename("stmt.AttrStmt"), Rule::promote_attr("attr_key")],
        )
        .rules(
            "Layout",
            [Rule::rename("tensor.Layout"), Rule::promote_attr("name")],
        )
        .rules(
            "Buffer",
            [
                Rule::rename("tensor.Buffer"),
                Rule::promote_attr("name"),
                Rule::promote_attr("scope"),
            ],
        )
        .build()
}

/// 0.8 gives modules an attribute dictionary; older snapshots get the
/// empty default. The tag assertion catches misregistration.
#[must_use]
pub fn step_07_to_08() -> RuleSet {
    RuleSet::builder("0.7", "0.8")
        .rule("ir.Module", Rule::fill_attr_for("ir.Module", "attrs", "0"))
        .build()
}

/// 0.9 adds span tracking to the expression and statement kinds that
/// carry source locations.
#[must_use]
pub fn step_08_to_09() -> RuleSet {
    let mut builder = RuleSet::builder("0.8", "0.9");
    for tag in SPAN_TAGS_08_TO_09 {
        builder = builder.rule(*tag, Rule::fill_attr("span", "0"));
    }
    builder.build()
}

/// Every historical step in version order
#[must_use]
pub fn default_steps() -> Vec<RuleSet> {
    vec![step_06_to_07(), step_07_to_08(), step_08_to_09()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::VersionChain;

    #[test]
    fn default_steps_form_a_contiguous_chain() {
        let chain = VersionChain::new(default_steps()).unwrap();
        assert_eq!(chain.terminal_version(), CURRENT_VERSION);
        assert_eq!(chain.steps().len(), 3);
    }

    #[test]
    fn step_versions() {
        assert_eq!(step_06_to_07().from_version(), "0.6");
        assert_eq!(step_06_to_07().to_version(), "0.7");
        assert_eq!(step_07_to_08().from_version(), "0.7");
        assert_eq!(step_08_to_09().to_version(), "0.9");
    }

    #[test]
    fn namespacing_step_registers_every_plain_rename() {
        let step = step_06_to_07();
        for (old, _) in RENAMES_06_TO_07 {
            assert!(step.rules_for(old).is_some(), "missing rules for {old}");
        }
    }

    #[test]
    fn variable_chain_renames_then_promotes() {
        let step = step_06_to_07();
        let chain = step.rules_for("Variable").unwrap();
        assert!(matches!(chain[0], Rule::Rename { .. }));
        assert!(matches!(chain[2], Rule::PromoteAttr { .. }));
    }

    #[test]
    fn module_fill_is_tag_guarded() {
        let step = step_07_to_08();
        let chain = step.rules_for("ir.Module").unwrap();
        assert!(matches!(
            &chain[0],
            Rule::FillAttr {
                expect_tag: Some(tag),
                ..
            } if tag == "ir.Module"
        ));
    }

    #[test]
    fn span_step_covers_location_carrying_tags() {
        let step = step_08_to_09();
        assert_eq!(step.len(), SPAN_TAGS_08_TO_09.len());
        assert!(step.rules_for("expr.Var").is_some());
    }
}
