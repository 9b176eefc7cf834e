//! Error types for bridge operations

use crate::host::{CssSyntaxError, PluginError};
use crate::optimizer::EngineError;
use thiserror::Error;

/// Errors that can occur while mapping between the host and optimizer trees
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A fragment failed to parse; positioned against the originating host node.
    #[error(transparent)]
    Syntax(#[from] CssSyntaxError),
    /// The engine failed for a reason other than a syntax error.
    #[error("optimizer failure: {0}")]
    Engine(EngineError),
    /// A tree violates an assumption the bridge depends on.
    #[error("malformed tree: {0}")]
    Structural(String),
}

impl BridgeError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        BridgeError::Structural(message.into())
    }
}

impl From<BridgeError> for PluginError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Syntax(syntax) => PluginError::Syntax(syntax),
            other => PluginError::Failed {
                plugin: crate::plugin::PLUGIN_NAME.to_string(),
                source: Box::new(other),
            },
        }
    }
}
