//! Span constructors for pool operations, so every caller-facing call is
//! traced under the same name and fields.

use tracing::{info_span, Span};

/// Span covering one mutating pool operation.
pub fn operation_span(op: &str, caller: &str) -> Span {
    info_span!("pool_op", op = %op, caller = %caller)
}

/// Span covering a read-only query.
pub fn query_span(query: &str) -> Span {
    tracing::debug_span!("pool_query", query = %query)
}
