//! Node grammar exchanged with the optimizer engine.
//!
//! The bridge builds `StyleSheet`, `Rule`, `Atrule` and `Comment` nodes itself and lets
//! the engine's fragment parser produce everything else. Apart from the `loc` backlink
//! the content of parsed nodes is the engine's business.

use crate::host::NodeId;
use std::fmt;

/// Non-owning reference from an optimizer node to the host node it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Backlink {
    node: NodeId,
}

impl Backlink {
    pub fn new(node: NodeId) -> Self {
        Backlink { node }
    }

    pub fn node(self) -> NodeId {
        self.node
    }
}

/// A node of the optimizer's tree.
#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    StyleSheet(StyleSheet),
    Rule(Rule),
    Atrule(Atrule),
    Declaration(Declaration),
    Comment(Comment),
    Block(Block),
    SelectorList(SelectorList),
    Selector(Selector),
    AtrulePrelude(AtrulePrelude),
    Value(Value),
    Raw(Raw),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub loc: Option<Backlink>,
    pub children: Vec<CssNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub loc: Option<Backlink>,
    /// Usually a `SelectorList`; `Raw` when the engine could not structure it.
    pub prelude: Box<CssNode>,
    /// Usually a `Block`.
    pub block: Box<CssNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atrule {
    pub loc: Option<Backlink>,
    pub name: String,
    pub prelude: Option<Box<CssNode>>,
    pub block: Option<Box<CssNode>>,
}

/// Importance flag of a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Important {
    #[default]
    Normal,
    /// `!important`
    Important,
    /// Any other `!ident` flag, e.g. the `ie` of `!ie`.
    Hack(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub loc: Option<Backlink>,
    pub important: Important,
    pub property: String,
    pub value: Box<CssNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub loc: Option<Backlink>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub loc: Option<Backlink>,
    pub children: Vec<CssNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorList {
    pub loc: Option<Backlink>,
    pub children: Vec<CssNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub loc: Option<Backlink>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtrulePrelude {
    pub loc: Option<Backlink>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub loc: Option<Backlink>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    pub loc: Option<Backlink>,
    pub value: String,
}

impl CssNode {
    /// Grammar name of the node.
    pub fn type_name(&self) -> &'static str {
        match self {
            CssNode::StyleSheet(_) => "StyleSheet",
            CssNode::Rule(_) => "Rule",
            CssNode::Atrule(_) => "Atrule",
            CssNode::Declaration(_) => "Declaration",
            CssNode::Comment(_) => "Comment",
            CssNode::Block(_) => "Block",
            CssNode::SelectorList(_) => "SelectorList",
            CssNode::Selector(_) => "Selector",
            CssNode::AtrulePrelude(_) => "AtrulePrelude",
            CssNode::Value(_) => "Value",
            CssNode::Raw(_) => "Raw",
        }
    }

    pub fn loc(&self) -> Option<Backlink> {
        *self.loc_slot()
    }

    pub fn set_loc(&mut self, loc: Option<Backlink>) {
        *self.loc_slot_mut() = loc;
    }

    fn loc_slot(&self) -> &Option<Backlink> {
        match self {
            CssNode::StyleSheet(node) => &node.loc,
            CssNode::Rule(node) => &node.loc,
            CssNode::Atrule(node) => &node.loc,
            CssNode::Declaration(node) => &node.loc,
            CssNode::Comment(node) => &node.loc,
            CssNode::Block(node) => &node.loc,
            CssNode::SelectorList(node) => &node.loc,
            CssNode::Selector(node) => &node.loc,
            CssNode::AtrulePrelude(node) => &node.loc,
            CssNode::Value(node) => &node.loc,
            CssNode::Raw(node) => &node.loc,
        }
    }

    fn loc_slot_mut(&mut self) -> &mut Option<Backlink> {
        match self {
            CssNode::StyleSheet(node) => &mut node.loc,
            CssNode::Rule(node) => &mut node.loc,
            CssNode::Atrule(node) => &mut node.loc,
            CssNode::Declaration(node) => &mut node.loc,
            CssNode::Comment(node) => &mut node.loc,
            CssNode::Block(node) => &mut node.loc,
            CssNode::SelectorList(node) => &mut node.loc,
            CssNode::Selector(node) => &mut node.loc,
            CssNode::AtrulePrelude(node) => &mut node.loc,
            CssNode::Value(node) => &mut node.loc,
            CssNode::Raw(node) => &mut node.loc,
        }
    }

    /// Child list of list-shaped nodes (`StyleSheet`, `Block`, `SelectorList`).
    pub fn children(&self) -> Option<&Vec<CssNode>> {
        match self {
            CssNode::StyleSheet(node) => Some(&node.children),
            CssNode::Block(node) => Some(&node.children),
            CssNode::SelectorList(node) => Some(&node.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<CssNode>> {
        match self {
            CssNode::StyleSheet(node) => Some(&mut node.children),
            CssNode::Block(node) => Some(&mut node.children),
            CssNode::SelectorList(node) => Some(&mut node.children),
            _ => None,
        }
    }
}

impl fmt::Display for CssNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
