//! A bridge between a CSS pipeline tree and a CSS optimizer tree
//!
//!     This crate lets a host pipeline, which owns a loosely structured CSS tree with formatting
//!     fragments, source positions and consumer metadata, run a CSS optimizer that works on its own,
//!     finer grained grammar tree. The document is mapped into the optimizer's tree, compressed
//!     there, and the result is written back into the host tree.
//!
//!     TLDR:
//!         - The bridge never parses or minifies CSS itself. Every textual fragment (selectors,
//!           at-rule preludes, declarations) goes through the engine behind the `Engine` trait
//!         - Every optimizer node produced from a host node carries a backlink to it, and the
//!           reverse mapping uses those backlinks to reuse host instances, so consumer metadata
//!           survives optimization
//!         - Fragment parse failures surface as host-native `CssSyntaxError`s positioned in the
//!           original document
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # BridgeError
//!     ├── options.rs              # Options forwarded to the engine
//!     ├── plugin.rs               # OptimizerPlugin, the orchestrator
//!     ├── host                    # The host tree, its serializer and its plugin pipeline
//!     ├── optimizer               # The optimizer grammar and the Engine trait
//!     └── mapping
//!         ├── forward.rs          # host → optimizer
//!         ├── errors.rs           # fragment parsing and error translation
//!         └── reverse.rs          # optimizer → host
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common                  # a small engine and host parser used by the tests
//!     └── <area>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     included as modules of tests/lib.rs.
//!
//! Core Algorithms
//!
//!     Forward mapping is a pre-order walk of the host tree (see ./mapping/forward.rs). Reverse
//!     mapping is a two phase reconciliation (see ./mapping/reverse.rs): a read-only plan of the
//!     new document, matching optimized nodes to the host instances they came from, followed by
//!     a single apply step. The first optimized node linking to a host instance gets to reuse it.
//!
//!     The bridge holds no state between documents. A plugin instance can process any number
//!     of documents, one at a time.

pub mod error;
pub mod host;
pub mod mapping;
pub mod optimizer;
pub mod options;
pub mod plugin;

pub use error::BridgeError;
pub use host::{CssSyntaxError, NodeId, NodeKind, Plugin, PluginError, Processor, Root};
pub use optimizer::{CssNode, Engine, EngineError, ParseContext};
pub use options::{CommentsMode, Options};
pub use plugin::{optimizer, OptimizerPlugin, PLUGIN_NAME};
