//! Conversions between the host tree and the optimizer tree.
//!
//! Forward mapping turns the host document into a `StyleSheet`, handing every textual
//! fragment to the engine's parser and tagging the results with backlinks. Reverse
//! mapping walks the optimized tree and rebuilds the host document from it, reusing the
//! host instances those backlinks point to.

pub mod errors;
pub mod forward;
pub mod reverse;

pub use errors::parse_fragment;
pub use forward::{declaration_source, to_optimizer};
pub use reverse::reconcile;
