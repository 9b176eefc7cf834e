//! Plugin lifecycle of the host pipeline.
//!
//! A [`Processor`] holds an ordered list of plugins and calls each plugin's single
//! `once` hook with the whole document. Plugins can be registered as instances or as
//! zero-argument factories; both end up as the same boxed plugin.

use super::{CssSyntaxError, Root};
use thiserror::Error;
use tracing::debug;

/// A whole-document transformation step.
pub trait Plugin: Send + Sync {
    /// Name reported in errors raised by this plugin.
    fn name(&self) -> &str;

    /// Called exactly once per processed document.
    fn once(&self, root: &mut Root) -> Result<(), PluginError>;
}

/// Failure raised by a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Positioned syntax error in the host's native shape.
    #[error("{0}")]
    Syntax(CssSyntaxError),
    /// Anything else; not recoverable by the pipeline.
    #[error("{plugin}: {source}")]
    Failed {
        plugin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PluginError {
    /// The syntax error, if this failure is one.
    pub fn as_syntax(&self) -> Option<&CssSyntaxError> {
        match self {
            PluginError::Syntax(error) => Some(error),
            PluginError::Failed { .. } => None,
        }
    }
}

impl From<CssSyntaxError> for PluginError {
    fn from(error: CssSyntaxError) -> Self {
        PluginError::Syntax(error)
    }
}

/// Output of a successful [`Processor::process`] run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub root: Root,
}

impl ProcessResult {
    pub fn css(&self) -> String {
        self.root.to_css()
    }
}

/// Runs plugins over documents.
#[derive(Default)]
pub struct Processor {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Processor {
    pub fn new() -> Self {
        Processor {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin instance.
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Register a plugin through its zero-argument factory.
    pub fn plugin_with<P, F>(self, factory: F) -> Self
    where
        P: Plugin + 'static,
        F: FnOnce() -> P,
    {
        self.plugin(factory())
    }

    /// Names of the registered plugins, in run order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    /// Run every plugin over `root`, in registration order.
    ///
    /// Syntax errors that do not name a plugin yet are attributed to the one that
    /// raised them.
    pub fn process(&self, mut root: Root) -> Result<ProcessResult, PluginError> {
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "running plugin");
            plugin.once(&mut root).map_err(|error| match error {
                PluginError::Syntax(mut syntax) => {
                    if syntax.plugin.is_none() {
                        syntax.plugin = Some(plugin.name().to_string());
                    }
                    PluginError::Syntax(syntax)
                }
                other => other,
            })?;
        }
        Ok(ProcessResult { root })
    }
}
