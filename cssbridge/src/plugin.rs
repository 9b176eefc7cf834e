//! The host plugin that runs an optimizer over a document.

use crate::error::BridgeError;
use crate::host::{Plugin, PluginError, Root};
use crate::mapping::{reconcile, to_optimizer};
use crate::optimizer::Engine;
use crate::options::Options;
use tracing::{debug, instrument};

/// Name the plugin registers under; prefixes its error messages.
pub const PLUGIN_NAME: &str = "cssbridge";

/// Minifies a host document in place with an [`Engine`].
///
/// Each run maps the document into the engine's tree, compresses it with the stored
/// [`Options`] and reconciles the result back into the same document. Nothing is kept
/// between runs.
#[derive(Debug, Clone)]
pub struct OptimizerPlugin<E> {
    engine: E,
    options: Options,
}

impl<E: Engine> OptimizerPlugin<E> {
    /// Plugin with default options.
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, Options::default())
    }

    pub fn with_options(engine: E, options: Options) -> Self {
        OptimizerPlugin { engine, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Forward, compress, reverse.
    #[instrument(level = "debug", skip_all, fields(nodes = root.descendants(root.id()).len()))]
    pub fn run(&self, root: &mut Root) -> Result<(), BridgeError> {
        let ast = to_optimizer(root, &self.engine)?;
        let optimized = self
            .engine
            .compress(ast, &self.options)
            .map_err(BridgeError::Engine)?;
        reconcile(root, &optimized, &self.engine)?;
        debug!(top_level = root.nodes().len(), "document optimized");
        Ok(())
    }
}

impl<E: Engine + Default> Default for OptimizerPlugin<E> {
    fn default() -> Self {
        Self::new(E::default())
    }
}

/// Zero-argument factory, for `Processor::plugin_with(optimizer::<MyEngine>)`.
pub fn optimizer<E: Engine + Default>() -> OptimizerPlugin<E> {
    OptimizerPlugin::default()
}

impl<E: Engine> Plugin for OptimizerPlugin<E> {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn once(&self, root: &mut Root) -> Result<(), PluginError> {
        self.run(root).map_err(PluginError::from)
    }
}
