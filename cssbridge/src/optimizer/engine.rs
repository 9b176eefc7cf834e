//! Optimizer engine interface.
//!
//! The engine is an external collaborator: it parses text fragments into its own
//! grammar, compresses whole trees and generates text back out of nodes. The bridge
//! only drives it.

use super::nodes::CssNode;
use crate::options::Options;
use std::fmt;
use thiserror::Error;

/// Grammar context a fragment is parsed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// A whole style sheet; the bridge only ever passes an empty one.
    Stylesheet,
    /// A comma separated selector list.
    SelectorList,
    /// A `{ ... }` block; the bridge only ever passes `{}`.
    Block,
    /// The prelude of an at-rule. The grammar depends on the at-rule name (media
    /// queries, page selectors, ...).
    AtrulePrelude { atrule: String },
    /// A single `property: value` declaration.
    Declaration,
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseContext::Stylesheet => f.write_str("stylesheet"),
            ParseContext::SelectorList => f.write_str("selectorList"),
            ParseContext::Block => f.write_str("block"),
            ParseContext::AtrulePrelude { atrule } => write!(f, "atrulePrelude(@{atrule})"),
            ParseContext::Declaration => f.write_str("declaration"),
        }
    }
}

/// Failure reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The fragment does not match the grammar of its context.
    ///
    /// `offset` is a character index into the exact fragment handed to the parser.
    #[error("{message}")]
    Syntax { message: String, offset: usize },
    /// Any other failure (invalid tree handed to `compress`, internal errors).
    #[error("{0}")]
    Internal(String),
}

/// A CSS optimizer the bridge can drive.
pub trait Engine: Send + Sync {
    /// Parse `source` under `context`.
    fn parse(&self, source: &str, context: &ParseContext) -> Result<CssNode, EngineError>;

    /// Minify/restructure a `StyleSheet`.
    ///
    /// Nodes derived from a single parsed node should keep its `loc`; a node merged from
    /// several should carry the `loc` of the first contributor.
    fn compress(&self, ast: CssNode, options: &Options) -> Result<CssNode, EngineError>;

    /// Serialize a node in the engine's compact form.
    fn generate(&self, node: &CssNode) -> String;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn parse(&self, source: &str, context: &ParseContext) -> Result<CssNode, EngineError> {
        (**self).parse(source, context)
    }

    fn compress(&self, ast: CssNode, options: &Options) -> Result<CssNode, EngineError> {
        (**self).compress(ast, options)
    }

    fn generate(&self, node: &CssNode) -> String {
        (**self).generate(node)
    }
}
