//! The optimizer side of the bridge: its node grammar and the engine interface.

pub mod engine;
pub mod nodes;

pub use engine::{Engine, EngineError, ParseContext};
pub use nodes::{
    Atrule, AtrulePrelude, Backlink, Block, Comment, CssNode, Declaration, Important, Raw, Rule,
    Selector, SelectorList, StyleSheet, Value,
};
