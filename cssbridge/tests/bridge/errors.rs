//! Fragment parse failures reported through the host pipeline.

use crate::common::{minify_with, parse, MiniEngine};
use cssbridge::mapping::declaration_source;
use cssbridge::{optimizer, NodeKind, PluginError, Processor, Root};
use insta::assert_snapshot;
use serde_json::json;

#[test]
fn selector_errors_point_into_the_document() {
    let error = minify_with("a \n :nth-child(2n+) { color: red }", json!({}))
        .expect_err("selector to be rejected");
    let syntax = error.as_syntax().expect("a host syntax error");

    assert_eq!(syntax.name(), "CssSyntaxError");
    assert_eq!(syntax.reason, "Integer is expected");
    assert_eq!((syntax.line, syntax.column), (Some(2), Some(16)));
    assert_eq!(syntax.plugin.as_deref(), Some("cssbridge"));
    assert_snapshot!(syntax.message(), @"cssbridge: <css input>:2:16: Integer is expected");
    assert_snapshot!(error.to_string(), @"CssSyntaxError: cssbridge: <css input>:2:16: Integer is expected");
}

#[test]
fn declaration_errors_point_into_the_document() {
    let error = minify_with(".a { color: red !; }", json!({})).expect_err("flag to be rejected");
    let syntax = error.as_syntax().expect("a host syntax error");
    assert_snapshot!(syntax.message(), @"cssbridge: <css input>:1:18: Identifier is expected");
}

#[test]
fn file_name_is_reported_when_known() {
    let mut root = Root::with_input(".a:nth-child(n-) {}", Some("theme.css".to_string()));
    let parsed = parse(".a:nth-child(n-) {}").expect("css to parse");
    let rule = root.rule(".a:nth-child(n-)");
    root.node_mut(rule).source = parsed.node(parsed.walk_rules()[0]).source;
    let root_id = root.id();
    root.append(root_id, rule);

    let error = Processor::new()
        .plugin_with(optimizer::<MiniEngine>)
        .process(root)
        .expect_err("selector to be rejected");
    assert_snapshot!(
        error.as_syntax().expect("a host syntax error").message(),
        @"cssbridge: theme.css:1:16: Integer is expected"
    );
}

#[test]
fn a_failed_run_leaves_the_document_alone() {
    let css = ".a { color: #ff0000 }\n.b:nth-child(2n+) { color: red }";
    let root = parse(css).expect("css to parse");
    let snapshot = root.to_css();

    let mut root = root;
    let plugin = optimizer::<MiniEngine>();
    let error = cssbridge::Plugin::once(&plugin, &mut root).expect_err("selector to be rejected");

    assert!(matches!(error, PluginError::Syntax(_)));
    assert_eq!(root.to_css(), snapshot);
}

#[test]
fn declaration_source_is_rebuilt_from_the_node() {
    let root = parse(".a {\n  *zoom: 1;\n  color : red !important }").expect("css to parse");
    let decls = root.walk_decls();
    assert_eq!(
        root.kind(decls[0]),
        &NodeKind::Decl {
            prop: "zoom".to_string(),
            value: "1".to_string(),
            important: false
        }
    );
    assert_eq!(declaration_source(&root, decls[0]), "*zoom: 1");
    assert_eq!(declaration_source(&root, decls[1]), "color : red !important");
}

#[test]
fn declaration_source_of_a_bare_node() {
    let mut root = Root::new();
    let decl = root.decl("color", "");
    assert_eq!(declaration_source(&root, decl), "color: ");
}
