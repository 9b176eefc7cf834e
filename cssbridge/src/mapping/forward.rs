//! Conversion from the host tree to the optimizer tree.
//!
//! One pass over the host tree, one case per host node kind:
//!
//! | Host node | Optimizer node                                                       |
//! |-----------|----------------------------------------------------------------------|
//! | Root      | `StyleSheet` parsed from `""`, children appended in order             |
//! | Rule      | `Rule` with the selector parsed as a selector list and a parsed `{}` block |
//! | AtRule    | `Atrule`; prelude parsed per at-rule name, `None` without params; block only when the node has a child list |
//! | Decl      | whatever the engine parses from the reconstructed declaration text    |
//! | Comment   | `Comment` holding `left + text + right` verbatim                     |
//! | other     | nothing                                                              |
//!
//! Every produced node carries a backlink to the host node it came from. The host tree
//! is only read.

use super::errors::parse_fragment;
use crate::error::BridgeError;
use crate::host::{NodeId, NodeKind, Root};
use crate::optimizer::{Atrule, Backlink, Comment, CssNode, Engine, ParseContext, Rule};
use tracing::{debug, trace};

/// Converts a host document to an optimizer `StyleSheet`.
pub fn to_optimizer<E: Engine + ?Sized>(root: &Root, engine: &E) -> Result<CssNode, BridgeError> {
    let mapper = ForwardMapper { root, engine };
    let stylesheet = mapper
        .map_node(root.id())?
        .ok_or_else(|| BridgeError::structural("document root produced no stylesheet"))?;
    debug!(nodes = root.descendants(root.id()).len(), "host tree mapped");
    Ok(stylesheet)
}

/// The text a declaration is parsed from: its leading raw text with whitespace
/// trimmed on the left, followed by its serialized `prop: value[ !important]` form.
///
/// Hacks kept in the leading raw text (such as the `*` of `*zoom: 1`) stay part of the
/// declaration. The result only equals the document substring when the declaration's
/// raws are the ones it was parsed with.
pub fn declaration_source(root: &Root, id: NodeId) -> String {
    let before = root.node(id).raws.before.as_deref().unwrap_or("");
    let mut source = before.trim_start().to_string();
    source.push_str(&root.node_to_string(id));
    source
}

struct ForwardMapper<'a, E: ?Sized> {
    root: &'a Root,
    engine: &'a E,
}

impl<E: Engine + ?Sized> ForwardMapper<'_, E> {
    fn parse(
        &self,
        origin: NodeId,
        source: &str,
        context: ParseContext,
    ) -> Result<CssNode, BridgeError> {
        parse_fragment(self.engine, self.root, origin, source, &context)
    }

    fn map_node(&self, id: NodeId) -> Result<Option<CssNode>, BridgeError> {
        let node = self.root.node(id);
        let loc = Some(Backlink::new(id));

        let mapped = match &node.kind {
            NodeKind::Root => {
                let stylesheet = self.parse(id, "", ParseContext::Stylesheet)?;
                self.append_children(stylesheet, id)?
            }
            NodeKind::Rule { selector } => {
                let prelude = self.parse(id, selector, ParseContext::SelectorList)?;
                let block = self.block(id)?;
                CssNode::Rule(Rule {
                    loc,
                    prelude: Box::new(prelude),
                    block: Box::new(block),
                })
            }
            NodeKind::AtRule { name, params } => {
                let prelude = if params.is_empty() {
                    None
                } else {
                    let context = ParseContext::AtrulePrelude {
                        atrule: name.clone(),
                    };
                    Some(Box::new(self.parse(id, params, context)?))
                };
                let block = match node.nodes() {
                    Some(_) => Some(Box::new(self.block(id)?)),
                    None => None,
                };
                CssNode::Atrule(Atrule {
                    loc,
                    name: name.clone(),
                    prelude,
                    block,
                })
            }
            NodeKind::Decl { prop, .. } => {
                if prop.is_empty() {
                    return Err(BridgeError::structural(format!(
                        "declaration {id} has no property"
                    )));
                }
                let source = declaration_source(self.root, id);
                self.parse(id, &source, ParseContext::Declaration)?
            }
            NodeKind::Comment { text } => {
                let raws = &node.raws;
                let mut value = raws.left.clone().unwrap_or_default();
                value.push_str(text);
                value.push_str(raws.right.as_deref().unwrap_or(""));
                CssNode::Comment(Comment { loc, value })
            }
            NodeKind::Other { kind } => {
                trace!(node = %id, kind = kind.as_str(), "skipping unsupported host node");
                return Ok(None);
            }
        };
        Ok(Some(mapped))
    }

    /// A parsed empty block with the node's children appended.
    fn block(&self, id: NodeId) -> Result<CssNode, BridgeError> {
        let block = self.parse(id, "{}", ParseContext::Block)?;
        self.append_children(block, id)
    }

    fn append_children(&self, mut target: CssNode, id: NodeId) -> Result<CssNode, BridgeError> {
        let nodes = self.root.children(id).ok_or_else(|| {
            BridgeError::structural(format!(
                "{} node {id} has no child list",
                self.root.kind(id).type_name()
            ))
        })?;

        let mut mapped = Vec::with_capacity(nodes.len());
        for &child in nodes {
            if let Some(node) = self.map_node(child)? {
                mapped.push(node);
            }
        }

        let type_name = target.type_name();
        let children = target.children_mut().ok_or_else(|| {
            BridgeError::structural(format!("parsed {type_name} has no child list"))
        })?;
        children.extend(mapped);
        Ok(target)
    }
}
