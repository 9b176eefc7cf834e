//! Host pipeline tree model.
//!
//!     The host owns the canonical tree of the document being processed. Nodes live in an
//!     arena inside [`Root`] and are addressed by [`NodeId`] handles, so the identity of a
//!     node is its id: two distinct instances never share one, and ids are never recycled
//!     within a root. External consumers attach arbitrary metadata to an instance through
//!     [`HostNode::extras`]; that metadata stays reachable for as long as the instance is
//!     part of the tree.
//!
//!     Every node keeps its semantic text (selector, at-rule name and params, declaration
//!     property and value, comment text) apart from its formatting fragments ([`Raws`]),
//!     which the stringifier uses to reproduce the original layout.
//!
//!     The file structure:
//!     .
//!     ├── mod.rs          # Root arena, node kinds, raws, constructors and mutation
//!     ├── error.rs        # CssSyntaxError and source-position translation
//!     ├── stringify.rs    # Serializer (Root::to_css, Root::node_to_string)
//!     └── pipeline.rs     # Plugin trait and the Processor that drives plugins

pub mod error;
pub mod pipeline;
pub mod stringify;

use serde_json::{Map, Value};
use std::fmt;

pub use error::CssSyntaxError;
pub use pipeline::{Plugin, PluginError, ProcessResult, Processor};

/// Handle to a node stored in a [`Root`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic content of a host node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Rule {
        selector: String,
    },
    AtRule {
        name: String,
        params: String,
    },
    Decl {
        prop: String,
        value: String,
        important: bool,
    },
    Comment {
        text: String,
    },
    /// Pipeline-specific node the bridge has no model for (structural placeholders,
    /// decorative nodes added by other plugins).
    Other {
        kind: String,
    },
}

impl NodeKind {
    /// The node type name as the pipeline reports it.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Rule { .. } => "rule",
            NodeKind::AtRule { .. } => "atrule",
            NodeKind::Decl { .. } => "decl",
            NodeKind::Comment { .. } => "comment",
            NodeKind::Other { kind } => kind,
        }
    }

    fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Root
                | NodeKind::Rule { .. }
                | NodeKind::AtRule { .. }
                | NodeKind::Other { .. }
        )
    }
}

/// Formatting fragments kept next to the semantic text.
///
/// `None` means the stringifier falls back to its default for that slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Text before the node (usually whitespace; may carry hacks such as `*`).
    pub before: Option<String>,
    /// Text before the closing brace of a container.
    pub after: Option<String>,
    /// Rule/at-rule: text before `{` or `;`. Declaration: the colon with its spacing.
    pub between: Option<String>,
    /// At-rule: text between the name and the params.
    pub after_name: Option<String>,
    /// Comment: text between `/*` and the comment text.
    pub left: Option<String>,
    /// Comment: text between the comment text and `*/`.
    pub right: Option<String>,
    /// Declaration: the literal importance flag when it differs from ` !important`.
    pub important: Option<String>,
    /// Container: whether the last child is followed by a semicolon.
    pub semicolon: bool,
}

/// A position in the source document.
///
/// `offset` is a character index into the input; `line` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }
}

/// Where a node came from in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub start: Position,
    pub end: Option<Position>,
}

/// The document text a tree was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub css: String,
    pub file: Option<String>,
}

/// A node in the host tree.
#[derive(Debug, Clone)]
pub struct HostNode {
    pub kind: NodeKind,
    pub raws: Raws,
    pub source: Option<Source>,
    /// Metadata attached by external consumers.
    pub extras: Map<String, Value>,
    parent: Option<NodeId>,
    nodes: Option<Vec<NodeId>>,
}

impl HostNode {
    fn new(kind: NodeKind) -> Self {
        let nodes = match kind {
            NodeKind::Root | NodeKind::Rule { .. } => Some(Vec::new()),
            _ => None,
        };
        HostNode {
            kind,
            raws: Raws::default(),
            source: None,
            extras: Map::new(),
            parent: None,
            nodes,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child list; `None` for leaves and for at-rules without a block.
    pub fn nodes(&self) -> Option<&[NodeId]> {
        self.nodes.as_deref()
    }
}

/// Document root and owner of every node of the tree.
#[derive(Debug, Clone)]
pub struct Root {
    arena: Vec<HostNode>,
    root: NodeId,
    input: Option<Input>,
}

impl Root {
    /// Create an empty document with no source text.
    pub fn new() -> Self {
        Root {
            arena: vec![HostNode::new(NodeKind::Root)],
            root: NodeId(0),
            input: None,
        }
    }

    /// Create an empty document that remembers the text it is being built from.
    pub fn with_input(css: impl Into<String>, file: Option<String>) -> Self {
        let mut root = Root::new();
        root.input = Some(Input {
            css: css.into(),
            file,
        });
        root
    }

    pub fn id(&self) -> NodeId {
        self.root
    }

    pub fn input(&self) -> Option<&Input> {
        self.input.as_ref()
    }

    /// Look up a node. Panics on a handle from another root.
    pub fn node(&self, id: NodeId) -> &HostNode {
        &self.arena[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut HostNode {
        &mut self.arena[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&HostNode> {
        self.arena.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).nodes()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Top-level nodes of the document.
    pub fn nodes(&self) -> &[NodeId] {
        self.children(self.root).unwrap_or(&[])
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(HostNode::new(kind));
        id
    }

    pub fn rule(&mut self, selector: impl Into<String>) -> NodeId {
        self.create(NodeKind::Rule {
            selector: selector.into(),
        })
    }

    /// An at-rule without a block (`@name params;`).
    pub fn at_rule(&mut self, name: impl Into<String>, params: impl Into<String>) -> NodeId {
        self.create(NodeKind::AtRule {
            name: name.into(),
            params: params.into(),
        })
    }

    /// An at-rule with an empty block (`@name params {}`).
    pub fn at_rule_with_block(
        &mut self,
        name: impl Into<String>,
        params: impl Into<String>,
    ) -> NodeId {
        let id = self.at_rule(name, params);
        self.node_mut(id).nodes = Some(Vec::new());
        id
    }

    pub fn decl(&mut self, prop: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.create(NodeKind::Decl {
            prop: prop.into(),
            value: value.into(),
            important: false,
        })
    }

    pub fn comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Comment { text: text.into() })
    }

    /// Append `child` to `parent`, moving it out of its previous parent.
    ///
    /// Appending to an at-rule without a block gives it one.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.kind(parent).is_container(),
            "cannot append to a {} node",
            self.kind(parent).type_name()
        );
        self.detach(child);
        self.arena[parent.0]
            .nodes
            .get_or_insert_with(Vec::new)
            .push(child);
        self.arena[child.0].parent = Some(parent);
    }

    /// Replace the child list of `parent`.
    ///
    /// Previous children that are not part of the new list are detached. `None` removes
    /// the child list altogether (an at-rule loses its block).
    pub fn set_children(&mut self, parent: NodeId, children: Option<Vec<NodeId>>) {
        let previous = self.arena[parent.0].nodes.take().unwrap_or_default();
        for old in previous {
            self.arena[old.0].parent = None;
        }
        if let Some(children) = &children {
            for &child in children {
                self.detach(child);
                self.arena[child.0].parent = Some(parent);
            }
        }
        self.arena[parent.0].nodes = children;
    }

    /// Remove a node from its parent's child list.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.arena[id.0].parent.take() {
            if let Some(siblings) = self.arena[parent.0].nodes.as_mut() {
                siblings.retain(|&sibling| sibling != id);
            }
        }
    }

    /// Attach a metadata field to a node instance.
    pub fn set_extra(&mut self, id: NodeId, key: impl Into<String>, value: Value) {
        self.node_mut(id).extras.insert(key.into(), value);
    }

    pub fn extra(&self, id: NodeId, key: &str) -> Option<&Value> {
        self.node(id).extras.get(key)
    }

    /// All descendants of `id` in document order (the node itself excluded).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .children(id)
            .map(|nodes| nodes.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(nodes) = self.children(next) {
                stack.extend(nodes.iter().rev().copied());
            }
        }
        out
    }

    /// Every rule of the document in document order.
    pub fn walk_rules(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| matches!(self.kind(id), NodeKind::Rule { .. }))
            .collect()
    }

    /// Every declaration of the document in document order.
    pub fn walk_decls(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| matches!(self.kind(id), NodeKind::Decl { .. }))
            .collect()
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}
