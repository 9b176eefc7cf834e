//! Host node instances and their metadata across a minification.

use crate::common::{parse, process, process_with};
use cssbridge::{NodeKind, Root};
use serde_json::{json, Value};

fn marker_sum(root: &Root) -> i64 {
    root.walk_rules()
        .iter()
        .filter_map(|&id| root.extra(id, "marker"))
        .filter_map(Value::as_i64)
        .sum()
}

#[test]
fn unchanged_rules_keep_their_metadata() {
    let mut root = parse(".a { p: 1 }\n.b { p: 2 }").expect("css to parse");
    for id in root.walk_rules() {
        root.set_extra(id, "marker", json!(1));
    }

    let root = process(root).expect("minify");

    assert_eq!(root.to_css(), ".a{p:1}.b{p:2}");
    assert_eq!(marker_sum(&root), 2);
}

#[test]
fn merged_rule_is_the_first_contributor() {
    let mut root = parse(".a { color: red }\n.b { color: red }").expect("css to parse");
    let rules = root.walk_rules();
    let (a, b) = (rules[0], rules[1]);
    root.set_extra(a, "marker", json!(1));
    root.set_extra(b, "marker", json!(10));

    let root = process(root).expect("minify");

    assert_eq!(root.to_css(), ".a,.b{color:red}");
    assert_eq!(root.nodes(), &[a]);
    assert_eq!(marker_sum(&root), 1);
    assert!(!root.is_attached(b));
    assert_eq!(root.parent(b), None);
}

#[test]
fn rewritten_values_patch_the_same_declaration() {
    let mut root = parse(".a { color: #ff0000 }").expect("css to parse");
    let decl = root.walk_decls()[0];
    root.set_extra(decl, "seen", json!(true));

    let root = process(root).expect("minify");

    assert_eq!(root.walk_decls(), vec![decl]);
    assert_eq!(root.extra(decl, "seen"), Some(&json!(true)));
    assert_eq!(
        root.kind(decl),
        &NodeKind::Decl {
            prop: "color".to_string(),
            value: "red".to_string(),
            important: false
        }
    );
}

#[test]
fn shorthand_reuses_the_first_longhand() {
    let css = ".a { padding-top: 1px; padding-right: 1px; padding-bottom: 1px; padding-left: 1px }";
    let root = parse(css).expect("css to parse");
    let longhands = root.walk_decls();

    let root = process(root).expect("minify");

    assert_eq!(root.to_css(), ".a{padding:1px}");
    assert_eq!(root.walk_decls(), vec![longhands[0]]);
    for &removed in &longhands[1..] {
        assert!(!root.is_attached(removed));
    }
}

#[test]
fn moved_rules_keep_their_instance() {
    let css = "@media print { .a { color: red } }\n@media print { .c { width: 1px } }";
    let root = parse(css).expect("css to parse");
    let rules = root.walk_rules();
    let media = root.nodes().to_vec();

    let root = process_with(root, json!({ "forceMediaMerge": true }))
        .expect("minify");

    assert_eq!(root.nodes(), &[media[0]]);
    assert_eq!(root.children(media[0]), Some(&rules[..]));
    assert_eq!(root.parent(rules[1]), Some(media[0]));
    assert!(!root.is_attached(media[1]));
}

#[test]
fn reused_nodes_keep_their_source() {
    let root = parse(".a { color: red }").expect("css to parse");
    let rule = root.walk_rules()[0];
    let source = root.node(rule).source;

    let root = process(root).expect("minify");

    assert_eq!(root.node(rule).source, source);
    assert!(source.is_some());
}

#[test]
fn removed_nodes_are_detached() {
    let root = parse(".a { color: red }\n.b { }\n/* note */").expect("css to parse");
    let before = root.nodes().to_vec();

    let root = process(root).expect("minify");

    assert_eq!(root.nodes(), &before[..1]);
    for &removed in &before[1..] {
        assert_eq!(root.parent(removed), None);
    }
}
