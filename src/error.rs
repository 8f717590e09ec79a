//! Error type for the converter.
//!
//! Markdown input is never an error: malformed constructs fall back to
//! literal text. Only resource exhaustion and broken internal invariants
//! surface here.

use std::collections::TryReserveError;

/// Failure while feeding or flushing a [`StreamParser`](crate::StreamParser).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Growing an output buffer failed. The parser must not be fed again
    /// without a reset.
    #[error("out of memory while growing an output buffer")]
    OutOfMemory(#[from] TryReserveError),

    /// An internal invariant was violated. This indicates a bug in the
    /// converter, not a problem with the input.
    #[error("structural error: {0}")]
    Structural(&'static str),
}

impl Error {
    /// Build a structural error and log it.
    pub(crate) fn structural(message: &'static str) -> Self {
        tracing::error!(message, "parser invariant violated");
        Self::Structural(message)
    }

    /// Whether this error came from allocation failure.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory(_))
    }
}
