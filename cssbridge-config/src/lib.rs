//! Shared configuration loader for the cssbridge plugin.
//!
//! `defaults/cssbridge.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BridgeConfig`], which
//! converts into the [`Options`] the plugin hands to its engine.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use cssbridge::options::{CommentsMode, Options};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/cssbridge.default.toml");

/// Top-level configuration consumed by applications embedding the plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub compress: CompressConfig,
    /// Keys forwarded to the engine as-is.
    #[serde(default)]
    pub engine: Map<String, Value>,
}

/// Mirrors the options understood by the optimizer engine.
#[derive(Debug, Clone, Deserialize)]
pub struct CompressConfig {
    pub restructure: bool,
    pub force_media_merge: bool,
    pub comments: CommentsMode,
    /// Usage data (`tags`, `ids`, `classes`, `scopes`) the engine may rely on.
    #[serde(default)]
    pub usage: Option<Value>,
}

impl From<CompressConfig> for Options {
    fn from(config: CompressConfig) -> Self {
        let options = Options::default()
            .restructure(config.restructure)
            .force_media_merge(config.force_media_merge)
            .comments(config.comments);
        match config.usage {
            Some(usage) => options.usage(usage),
            None => options,
        }
    }
}

impl From<BridgeConfig> for Options {
    fn from(config: BridgeConfig) -> Self {
        let mut options = Options::from(config.compress);
        options.extra = config.engine;
        options
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. a configuration section read from a project manifest.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for command-line settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BridgeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    /// Build and convert straight into plugin options.
    pub fn options(self) -> Result<Options, ConfigError> {
        self.build().map(Options::from)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BridgeConfig, ConfigError> {
    Loader::new().build()
}
