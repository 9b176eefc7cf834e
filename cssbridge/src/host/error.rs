//! Host-native syntax errors and source-position translation.

use super::{NodeId, Root};
use std::fmt;

/// Syntax error in the shape the host pipeline reports to its callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSyntaxError {
    /// Message of whoever detected the problem, verbatim.
    pub reason: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    /// Plugin that raised the error, filled in by the processor.
    pub plugin: Option<String>,
}

impl CssSyntaxError {
    pub fn new(reason: impl Into<String>) -> Self {
        CssSyntaxError {
            reason: reason.into(),
            file: None,
            line: None,
            column: None,
            plugin: None,
        }
    }

    pub fn name(&self) -> &'static str {
        "CssSyntaxError"
    }

    /// `plugin: file:line:column: reason`, omitting the parts that are unknown.
    pub fn message(&self) -> String {
        let mut message = String::new();
        if let Some(plugin) = &self.plugin {
            message.push_str(plugin);
            message.push_str(": ");
        }
        message.push_str(self.file.as_deref().unwrap_or("<css input>"));
        if let (Some(line), Some(column)) = (self.line, self.column) {
            message.push_str(&format!(":{line}:{column}"));
        }
        message.push_str(": ");
        message.push_str(&self.reason);
        message
    }
}

impl fmt::Display for CssSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message())
    }
}

impl std::error::Error for CssSyntaxError {}

impl Root {
    /// Build a syntax error located at `node`, or `index` characters into it.
    ///
    /// Nodes without a source position produce an error without line/column.
    pub fn error(
        &self,
        node: NodeId,
        reason: impl Into<String>,
        index: Option<usize>,
    ) -> CssSyntaxError {
        let mut error = CssSyntaxError::new(reason);
        error.file = self.input().and_then(|input| input.file.clone());
        let position = match index {
            Some(index) => self.position_inside(node, index),
            None => self
                .node(node)
                .source
                .map(|source| (source.start.line, source.start.column)),
        };
        if let Some((line, column)) = position {
            error.line = Some(line);
            error.column = Some(column);
        }
        error
    }

    /// Line and column of the character `index` characters past the start of `node`.
    ///
    /// Walks the original input from the node's start offset. When the root has no
    /// input the node's own serialization is walked instead. An index past the end of
    /// the walked text stops at its end.
    pub fn position_inside(&self, node: NodeId, index: usize) -> Option<(usize, usize)> {
        let start = self.node(node).source?.start;
        let (mut line, mut column) = (start.line, start.column);

        let walked: String = match self.input() {
            Some(input) => input.css.chars().skip(start.offset).take(index).collect(),
            None => self.node_to_string(node).chars().take(index).collect(),
        };
        for ch in walked.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Some((line, column))
    }
}
