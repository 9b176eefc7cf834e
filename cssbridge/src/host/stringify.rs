//! Host tree serializer.
//!
//! Reproduces a node from its semantic text and its [`Raws`](super::Raws). Missing raws
//! fall back to the defaults below, which give readable output for trees built in code.

use super::{NodeId, NodeKind, Root};

const DEFAULT_COLON: &str = ": ";
const DEFAULT_BEFORE_OPEN: &str = " ";
const DEFAULT_AFTER: &str = "\n";
const DEFAULT_COMMENT_SPACING: &str = " ";
const DEFAULT_IMPORTANT: &str = " !important";

impl Root {
    /// Serialize the whole document, including the root's trailing `after`.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        Stringifier { root: self }.body(self.id(), &mut out);
        if let Some(after) = &self.node(self.id()).raws.after {
            out.push_str(after);
        }
        out
    }

    /// Serialize a single node (and its descendants) without a trailing semicolon.
    pub fn node_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        let stringifier = Stringifier { root: self };
        if id == self.id() {
            stringifier.body(id, &mut out);
        } else {
            stringifier.node(id, false, &mut out);
        }
        out
    }
}

struct Stringifier<'a> {
    root: &'a Root,
}

impl Stringifier<'_> {
    fn node(&self, id: NodeId, semicolon: bool, out: &mut String) {
        let node = self.root.node(id);
        let raws = &node.raws;
        match &node.kind {
            NodeKind::Root => self.body(id, out),
            NodeKind::Rule { selector } => {
                out.push_str(selector);
                out.push_str(raws.between.as_deref().unwrap_or(DEFAULT_BEFORE_OPEN));
                self.block(id, out);
            }
            NodeKind::AtRule { name, params } => {
                out.push('@');
                out.push_str(name);
                match &raws.after_name {
                    Some(after_name) => out.push_str(after_name),
                    None if !params.is_empty() => out.push(' '),
                    None => {}
                }
                out.push_str(params);
                if node.nodes().is_some() {
                    out.push_str(raws.between.as_deref().unwrap_or(DEFAULT_BEFORE_OPEN));
                    self.block(id, out);
                } else {
                    out.push_str(raws.between.as_deref().unwrap_or(""));
                    out.push(';');
                }
            }
            NodeKind::Decl {
                prop,
                value,
                important,
            } => {
                out.push_str(prop);
                out.push_str(raws.between.as_deref().unwrap_or(DEFAULT_COLON));
                out.push_str(value);
                if *important {
                    out.push_str(raws.important.as_deref().unwrap_or(DEFAULT_IMPORTANT));
                }
                if semicolon {
                    out.push(';');
                }
            }
            NodeKind::Comment { text } => {
                out.push_str("/*");
                out.push_str(raws.left.as_deref().unwrap_or(DEFAULT_COMMENT_SPACING));
                out.push_str(text);
                out.push_str(raws.right.as_deref().unwrap_or(DEFAULT_COMMENT_SPACING));
                out.push_str("*/");
            }
            NodeKind::Other { .. } => {}
        }
    }

    fn block(&self, id: NodeId, out: &mut String) {
        out.push('{');
        let has_children = self.root.children(id).is_some_and(|nodes| !nodes.is_empty());
        self.body(id, out);
        let after = match &self.root.node(id).raws.after {
            Some(after) => after.as_str(),
            None if has_children => DEFAULT_AFTER,
            None => "",
        };
        out.push_str(after);
        out.push('}');
    }

    fn body(&self, id: NodeId, out: &mut String) {
        let Some(nodes) = self.root.children(id) else {
            return;
        };
        let semicolon = self.root.node(id).raws.semicolon;

        // Trailing comments do not count when deciding where the last semicolon goes.
        let mut last = nodes.len().saturating_sub(1);
        while last > 0 && matches!(self.root.kind(nodes[last]), NodeKind::Comment { .. }) {
            last -= 1;
        }

        for (i, &child) in nodes.iter().enumerate() {
            if let Some(before) = &self.root.node(child).raws.before {
                out.push_str(before);
            }
            self.node(child, i != last || semicolon, out);
        }
    }
}
