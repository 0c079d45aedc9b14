//! Functional tests for end-to-end snapshot migration.
//!
//! Core guarantees exercised here:
//! - A legacy snapshot migrates to the terminal version with its inline
//!   strings promoted to appended nodes and its tags renamed in place.
//! - Unknown source versions are rejected outright; no output is produced.
//! - Migrating an already-current snapshot is a no-op.
//! - Running the chain in one call equals running it as separate calls per
//!   version step (composition is associative).
//! - Node positions never shift: untouched nodes stay where they were and
//!   the table only ever grows at the end.

use pretty_assertions::assert_eq;
use uplift_migrate::{MigrateError, Rule, RuleSet, VersionChain, STRING_TYPE_KEY};
use uplift_snapshot::{AttrValue, Node, NodeIndex, NodeTable, Snapshot};

fn snapshot(version: &str, nodes: Vec<Node>) -> Snapshot {
    Snapshot::new(version, NodeTable::from(nodes), NodeIndex::new(0)).unwrap()
}

/// Tenet: a legacy variable migrates by rename plus name promotion.
///
/// This is the canonical end-to-end shape: the `0.6` node is renamed into
/// its namespace, its inline `name` string moves into a new appended
/// node, and the attribute becomes an index reference to it. The final
/// envelope version is exactly the terminal version string.
#[test]
fn legacy_variable_migrates_to_terminal_form() {
    let chain = VersionChain::with_defaults();
    let mut snap = snapshot(
        "0.6.1",
        vec![Node::new("Variable").with_attr("name", "x")],
    );

    chain.migrate(&mut snap).unwrap();

    assert_eq!(snap.version(), "0.9");
    assert_eq!(snap.nodes().len(), 2);

    let var = snap.nodes().get(NodeIndex::new(0)).unwrap();
    assert_eq!(var.type_key(), "expr.Var");
    assert_eq!(var.attr("name"), Some(&AttrValue::index(NodeIndex::new(1))));
    assert_eq!(var.attr("type_annotation"), Some(&AttrValue::str("0")));
    assert_eq!(var.attr("span"), Some(&AttrValue::str("0")));

    let promoted = snap.nodes().get(NodeIndex::new(1)).unwrap();
    assert_eq!(promoted.type_key(), STRING_TYPE_KEY);
    assert_eq!(promoted.repr_str(), Some("x"));
}

/// Tenet: unrecognized source versions fail fatally with no output.
///
/// Guessing at an unknown version could silently corrupt the graph, so
/// the driver must refuse rather than no-op.
#[test]
fn unknown_source_version_is_rejected() {
    let chain = VersionChain::with_defaults();
    let text = r#"{"root": 0, "nodes": [{"type_key": "Variable", "attrs": {"name": "x"}}], "attrs": {"ir_version": "0.3"}}"#;

    let result = chain.migrate_json(text);
    assert!(matches!(
        result,
        Err(MigrateError::UnknownSourceVersion(v)) if v == "0.3"
    ));
}

/// Tenet: migration at the terminal version is a no-op.
///
/// No rule set is selected for a snapshot already in current format; the
/// content comes back semantically identical.
#[test]
fn terminal_version_migration_is_noop() {
    let chain = VersionChain::with_defaults();
    let mut snap = snapshot(
        "0.9",
        vec![Node::new("expr.Var")
            .with_attr("name", NodeIndex::new(1))
            .with_attr("span", "0")],
    );
    // Keep the reference valid for the comparison snapshot too.
    snap.nodes_mut().append(Node::new(STRING_TYPE_KEY).with_repr_str("x"));
    let before = snap.clone();

    chain.migrate(&mut snap).unwrap();
    assert_eq!(snap, before);
}

/// Tenet: chain composition is associative.
///
/// Migrating `0.6 -> terminal` in one call must equal migrating
/// `0.6 -> 0.7` and then `0.7 -> terminal` as two separate calls —
/// later steps assume exactly the shape earlier steps produce.
#[test]
fn one_call_equals_stepwise_composition() {
    let nodes = vec![
        Node::new("Variable").with_attr("name", "x"),
        Node::new("graph.Module"),
        Node::new("Add"),
    ];

    let mut one_shot = snapshot("0.6.0", nodes.clone());
    VersionChain::with_defaults().migrate(&mut one_shot).unwrap();

    let mut stepwise = snapshot("0.6.0", nodes);
    let first = VersionChain::new(vec![uplift_migrate::catalog::step_06_to_07()]).unwrap();
    first.migrate(&mut stepwise).unwrap();
    assert_eq!(stepwise.version(), "0.7");
    VersionChain::with_defaults().migrate(&mut stepwise).unwrap();

    assert_eq!(one_shot, stepwise);
}

/// Tenet: untouched nodes keep their positions and the table only grows.
#[test]
fn untouched_positions_are_stable_and_growth_is_append_only() {
    let chain = VersionChain::with_defaults();
    let mut snap = snapshot(
        "0.6.0",
        vec![
            Node::new("Opaque").with_attr("payload", "p"),
            Node::new("Variable").with_attr("name", "v"),
            Node::new("AlsoOpaque"),
        ],
    );
    let original_len = snap.nodes().len();

    chain.migrate(&mut snap).unwrap();

    assert!(snap.nodes().len() >= original_len);
    let first = snap.nodes().get(NodeIndex::new(0)).unwrap();
    assert_eq!(first.type_key(), "Opaque");
    assert_eq!(first.attr("payload"), Some(&AttrValue::str("p")));
    assert_eq!(snap.nodes().get(NodeIndex::new(2)).unwrap().type_key(), "AlsoOpaque");
}

/// Tenet: cross-reference rewrites read before they tombstone.
///
/// A legacy type variable holds a raw index to its binder node. The
/// rewrite must copy the binder's name onto the type variable, retire the
/// binder in place (never remove it), and leave no reference behind.
#[test]
fn cross_reference_rewrite_inlines_and_tombstones() {
    let chain = VersionChain::with_defaults();
    let mut snap = snapshot(
        "0.6.0",
        vec![
            Node::new("graph.TypeVar")
                .with_attr("var", "1")
                .with_attr("kind", "0"),
            Node::new("Variable").with_attr("name", "t"),
        ],
    );

    chain.migrate(&mut snap).unwrap();

    let tv = snap.nodes().get(NodeIndex::new(0)).unwrap();
    assert_eq!(tv.type_key(), "TypeVar");
    assert!(!tv.has_attr("var"));
    // name_hint was inlined, then promoted to an appended string node.
    let hint = tv.attr("name_hint").and_then(AttrValue::as_index).unwrap();
    assert_eq!(snap.nodes().get(hint).unwrap().repr_str(), Some("t"));

    // The binder stays in place as a tombstone; the table never shrinks.
    assert!(snap.nodes().get(NodeIndex::new(1)).unwrap().is_tombstone());
    assert_eq!(snap.nodes().len(), 3);
}

/// Tenet: rules registered for one tag run in declared order.
///
/// With `[A, B]` the node must reflect `B(A(node))`. Here A moves `x`
/// away and B refills it — run in the other order, B's fill would be a
/// no-op and `x` would end up absent.
#[test]
fn rule_chains_apply_in_registration_order() {
    let step = RuleSet::builder("0.6", "0.7")
        .rules(
            "T",
            [
                Rule::move_key(
                    uplift_migrate::MoveSource::Attr("x".to_string()),
                    uplift_migrate::MoveDest::Attr("y".to_string()),
                ),
                Rule::fill_attr("x", "default"),
            ],
        )
        .build();
    let chain = VersionChain::new(vec![step]).unwrap();

    let mut snap = snapshot("0.6.0", vec![Node::new("T").with_attr("x", "orig")]);
    chain.migrate(&mut snap).unwrap();

    let node = snap.nodes().get(NodeIndex::new(0)).unwrap();
    assert_eq!(node.attr("y"), Some(&AttrValue::str("orig")));
    assert_eq!(node.attr("x"), Some(&AttrValue::str("default")));
}

/// Tenet: the serialized pipeline preserves what it does not understand.
///
/// Auxiliary envelope keys and unknown node record keys must survive
/// decode -> migrate -> encode untouched.
#[test]
fn migrate_json_preserves_unknown_payloads() {
    let chain = VersionChain::with_defaults();
    let text = r#"{
        "root": 0,
        "nodes": [
            {"type_key": "Variable", "attrs": {"name": "x"}, "data": 3}
        ],
        "attrs": {"ir_version": "0.6.0", "producer": "frontend-2.1"},
        "b64ndarrays": ["AAAA"]
    }"#;

    let out = chain.migrate_json(text).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(parsed["attrs"]["ir_version"], "0.9");
    assert_eq!(parsed["attrs"]["producer"], "frontend-2.1");
    assert_eq!(parsed["b64ndarrays"][0], "AAAA");
    assert_eq!(parsed["nodes"][0]["data"], 3);
    assert_eq!(parsed["root"], 0);
}

/// Tenet: module attribute defaults are introduced exactly once.
///
/// The `0.7 -> 0.8` fill only adds the dictionary when absent, and the
/// `0.8 -> 0.9` span fill applies to modules as well.
#[test]
fn module_defaults_fill_only_when_missing() {
    let chain = VersionChain::with_defaults();
    let mut snap = snapshot(
        "0.7.1",
        vec![Node::new("ir.Module").with_attr("attrs", "5")],
    );

    chain.migrate(&mut snap).unwrap();

    let module = snap.nodes().get(NodeIndex::new(0)).unwrap();
    assert_eq!(module.attr("attrs"), Some(&AttrValue::str("5")));
    assert_eq!(module.attr("span"), Some(&AttrValue::str("0")));
    assert_eq!(snap.version(), "0.9");
}
