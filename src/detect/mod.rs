//! # Layer 4: Capability Inspector
//!
//! Works out which capabilities a concrete allocator type actually has.
//! The answers come from the shape of its `Allocator` impl, never from a
//! declaration the author could get wrong:
//!
//! | Fact                | Read from                                         |
//! |---------------------|---------------------------------------------------|
//! | NoFailureTracking   | every present operation is `#[untracked]`         |
//! | SharedMemory        | span type returned by `allocate`                  |
//! | SharedInstance      | `Send + Sync` on the allocator type               |
//!
//! The first fact is all-or-nothing: one tracked optional operation is
//! enough to disqualify an allocator whose `allocate` is untracked.
//!
//! ## Public API
//!
//! ```
//! use allocator_caps::{inspect, GlobalHeap};
//!
//! let report = inspect!(GlobalHeap);
//! assert!(report.no_failure_tracking());
//! assert!(!report.shared_memory());
//! assert!(report.shared_instance());
//! ```
//!
//! `inspect!` only works on concrete types; in generic code use
//! [`Inspection::of`] and supply the `Send + Sync` answer yourself.

pub mod autoref;

use core::fmt;

use crate::caps::CapabilitySet;
use crate::interface::Operations;
use crate::primitives::{Span, SpanKind};
use crate::protocol::Allocator;

pub use autoref::Detect;

/// What structural inspection found out about one allocator type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inspection {
    declared: Operations,
    untracked: Operations,
    span: SpanKind,
    shareable: bool,
}

impl Inspection {
    /// Builds a report from raw facts. Untracked operations that are not
    /// declared are ignored.
    pub const fn new(declared: Operations, untracked: Operations, span: SpanKind, shareable: bool) -> Self {
        Self {
            declared,
            untracked: untracked.intersection(declared),
            span,
            shareable,
        }
    }

    /// Report for `A`, with the `Send + Sync` answer supplied by the caller.
    pub const fn of<A: Allocator>(shareable: bool) -> Self {
        Self::new(A::OPERATIONS, A::UNTRACKED, <A::Span as Span>::KIND, shareable)
    }

    /// Operations the allocator implements.
    pub const fn declared(&self) -> Operations {
        self.declared
    }

    pub const fn untracked(&self) -> Operations {
        self.untracked
    }

    /// Present operations that still depend on failure tracking.
    pub const fn tracked(&self) -> Operations {
        self.declared.difference(self.untracked)
    }

    pub const fn span(&self) -> SpanKind {
        self.span
    }

    /// All-or-nothing over the present operations.
    pub const fn no_failure_tracking(&self) -> bool {
        self.tracked().is_empty()
    }

    pub const fn shared_memory(&self) -> bool {
        matches!(self.span, SpanKind::Shared)
    }

    pub const fn shared_instance(&self) -> bool {
        self.shareable
    }

    /// The strongest capability set the allocator can serve.
    pub const fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::from_flags(self.no_failure_tracking(), self.shared_memory(), self.shared_instance())
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (operations {}, {} spans",
            self.capabilities(),
            self.declared,
            self.span
        )?;
        if !self.no_failure_tracking() {
            write!(f, ", tracked {}", self.tracked())?;
        }
        f.write_str(")")
    }
}

/// Inspects a concrete allocator type.
///
/// Expands to an [`Inspection`]; the `Send + Sync` fact is detected through
/// autoref specialization, so `$ty` must be a concrete type.
#[macro_export]
macro_rules! inspect {
    ($ty:ty) => {{
        #[allow(unused_imports)]
        use $crate::detect::autoref::SharedInstanceFallback as _;
        $crate::detect::Inspection::of::<$ty>($crate::detect::Detect::<$ty>::IS_SHARED_INSTANCE)
    }};
}
