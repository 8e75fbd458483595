//! Errors raised while building a handle.
//!
//! Neither type ever describes an operational failure: a failed `allocate`
//! is a null span, not an error.

use thiserror::Error;

use crate::caps::CapabilitySet;
use crate::interface::Operations;
use crate::primitives::SpanKind;

/// The allocator could not provide a block to hold its own adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WrapError {
    #[error("allocator returned no block of {size} bytes aligned to {align}")]
    BlockUnavailable { size: usize, align: usize },

    #[error("allocator returned a block at {addr:#x} that is not aligned to {align}")]
    MisalignedBlock { addr: usize, align: usize },
}

/// First rule a concrete allocator breaks for a requested capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("span kind mismatch: {requested} spans requested, allocator produces {provided} spans")]
    SpanMismatch { requested: SpanKind, provided: SpanKind },

    #[error("operations {operations} are not exempt from runtime failure tracking")]
    FailureTracked { operations: Operations },

    #[error("allocator cannot be shared between threads (not Send + Sync)")]
    NotShareable,

    #[error("an existing {provided} interface cannot be re-erased as {requested}")]
    ErasedMismatch { requested: CapabilitySet, provided: CapabilitySet },
}
