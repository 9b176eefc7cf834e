//! User options forwarded to the optimizer engine.
//!
//! The bridge does not interpret any of these; they are handed to
//! [`Engine::compress`](crate::optimizer::Engine::compress) as-is. Keys the bridge does
//! not know are kept in [`Options::extra`] so engines can define their own.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which comments the engine should keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentsMode {
    /// Keep every `/*! ... */` comment.
    #[default]
    Exclamation,
    /// Keep only the first `/*! ... */` comment.
    FirstExclamation,
    /// Drop all comments.
    None,
}

/// Options recognized by the bridge/engine pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Cross-rule merging and splitting.
    pub restructure: bool,
    /// Merge at-rules with identical preludes even when they are not adjacent.
    pub force_media_merge: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<CommentsMode>,
    /// Usage data hints (known classes, tags, ids).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    /// Engine-specific keys, forwarded untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            restructure: true,
            force_media_merge: false,
            comments: None,
            usage: None,
            extra: Map::new(),
        }
    }
}

impl Options {
    /// Read options from a JSON-like value; missing keys take their defaults.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn restructure(mut self, restructure: bool) -> Self {
        self.restructure = restructure;
        self
    }

    pub fn force_media_merge(mut self, force_media_merge: bool) -> Self {
        self.force_media_merge = force_media_merge;
        self
    }

    pub fn comments(mut self, comments: CommentsMode) -> Self {
        self.comments = Some(comments);
        self
    }

    pub fn usage(mut self, usage: Value) -> Self {
        self.usage = Some(usage);
        self
    }
}
