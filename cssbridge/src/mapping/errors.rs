//! Fragment parsing with host-native error positions.
//!
//! Every fragment the forward mapper hands to the engine goes through
//! [`parse_fragment`]. A syntax failure is re-raised as a [`CssSyntaxError`] built
//! from the host node the fragment came from, with the engine's offset translated into
//! a line and column of the original document. The reason text is the engine's message,
//! unchanged.
//!
//! The offset is relative to the exact string the engine saw. For declarations that
//! string is reconstructed (see [`declaration_source`](super::forward::declaration_source))
//! and can differ from the document text, in which case the reported position is off by
//! the difference. That is left as is: callers match on the resulting messages.
//!
//! [`CssSyntaxError`]: crate::host::CssSyntaxError

use crate::error::BridgeError;
use crate::host::{NodeId, Root};
use crate::optimizer::{Backlink, CssNode, Engine, EngineError, ParseContext};
use tracing::trace;

/// Parse `source` under `context` and backlink the result to `origin`.
pub fn parse_fragment<E: Engine + ?Sized>(
    engine: &E,
    root: &Root,
    origin: NodeId,
    source: &str,
    context: &ParseContext,
) -> Result<CssNode, BridgeError> {
    trace!(node = %origin, %context, source, "parsing fragment");
    match engine.parse(source, context) {
        Ok(mut node) => {
            node.set_loc(Some(Backlink::new(origin)));
            Ok(node)
        }
        Err(EngineError::Syntax { message, offset }) => {
            Err(BridgeError::Syntax(root.error(origin, message, Some(offset))))
        }
        Err(other) => Err(BridgeError::Engine(other)),
    }
}
