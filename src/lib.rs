#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::crate_in_macro_def)]

// Feature flags handled:
// - std: default, enables std library and the default allocator registry

//! # allocator-caps
//!
//! Capability-driven allocator type erasure.
//!
//! **Derive an allocator interface from a capability set, then adapt
//! concrete allocators to it.**
//!
//! ## Architecture
//!
//! A consumer states the guarantees it needs as a capability set. The set
//! alone decides the operation surface it will call: the span type, whether
//! every operation is exempt from runtime failure tracking, and whether the
//! interface may be shared between threads. A concrete allocator is then
//! checked against the set at compile time and erased behind that surface.
//!
//! ```text
//! caps![...] ──> Caps<NT, SM, SI> ──> C::Interface (13 operations)
//!                                          ^
//! concrete allocator ─#[allocator]─> Allocator ──Compatible<C>──> wrap() ──> AllocatorHandle<C>
//! ```
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Primitives                                              |
//! |  - Present/Absent, ByteSpan/SharedSpan, Ternary, TypeTag          |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1-2: Capability Sets & Interface Generator                 |
//! |  - CapabilitySet, Caps<NT, SM, SI>, caps![]                       |
//! |  - InterfaceDescriptor, AllocatorInterface<C>                     |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 3-5: Protocol, Inspector & Checker                         |
//! |  - Allocator, #[allocator], #[untracked], inspect!                |
//! |  - Compatible<C>, Wrap<C>, check, compatible!                     |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 6-8: Adapter Factory & Defaults                            |
//! |  - wrap, wrap_copied, AllocatorHandle, Storage                    |
//! |  - GlobalHeap, thread/process default allocators                  |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - **Checked at construction**: an allocator that cannot honour the
//!   requested set is a compile error, never a runtime fallback
//! - **All-or-nothing inspection**: one tracked operation disqualifies an
//!   allocator from `NoFailureTracking`
//! - **Fixed degradation**: omitted operations answer `false`, a null span
//!   or `Unknown`, decided once per adapter type
//! - **Auditable ownership**: every handle records whether it is a
//!   singleton, an owned copy or an owned move
//!
//! ## Quick Start
//!
//! ```
//! use allocator_caps::prelude::*;
//! use core::cell::Cell;
//!
//! struct Counting {
//!     live: Cell<usize>,
//! }
//!
//! #[allocator]
//! unsafe impl Counting {
//!     fn allocate(&self, size: usize) -> ByteSpan {
//!         let span = GlobalHeap.allocate(size, None);
//!         if !span.is_null() {
//!             self.live.set(self.live.get() + 1);
//!         }
//!         span
//!     }
//!
//!     unsafe fn deallocate(&self, span: ByteSpan) -> bool {
//!         let released = unsafe { GlobalHeap.deallocate(span) };
//!         if released {
//!             self.live.set(self.live.get() - 1);
//!         }
//!         released
//!     }
//! }
//!
//! let handle: AllocatorHandle<caps![]> = wrap(Counting { live: Cell::new(0) }).unwrap();
//! assert_eq!(handle.storage(), Storage::OwnedMoved);
//!
//! let span = handle.allocate(32, None);
//! assert!(span.len() >= 32);
//! assert!(unsafe { handle.deallocate(span) });
//! assert!(handle.owns(span).is_unknown());
//! ```

// Allow `::allocator_caps` to work inside the crate itself
extern crate self as allocator_caps;

extern crate alloc;

// =============================================================================
// Layer 0: Primitives (no dependencies)
// =============================================================================
pub mod primitives;

// =============================================================================
// Layer 1-2: Capability Sets & Interface Generator
// =============================================================================
pub mod caps;
pub mod interface;

// =============================================================================
// Layer 3-5: Protocol, Inspector & Checker
// =============================================================================
pub mod protocol;
pub mod detect;
pub mod compat;
pub mod error;

// =============================================================================
// Layer 6-8: Adapter Factory & Defaults
// =============================================================================
pub mod adapter;
pub mod heap;
#[cfg(feature = "std")]
pub mod registry;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use adapter::{wrap, wrap_copied, AllocatorHandle, Storage};
pub use caps::{
    Capabilities, Capability, CapabilitySet, Caps, NoFailureTracking, SetUnion, SharedInstance, SharedMemory,
    SupersetOf, With,
};
pub use compat::{check, check_erased, Compatible, Wrap};
pub use detect::Inspection;
pub use error::{Incompatibility, WrapError};
pub use heap::GlobalHeap;
pub use interface::{
    AllocatorInterface, Fallback, InterfaceDescriptor, Operation, Operations, ReturnKind, Signature, PLATFORM_ALIGNMENT,
};
pub use primitives::{Absent, Bool, ByteSpan, Present, SharedSpan, Span, SpanKind, Ternary, TypeTag};
pub use protocol::Allocator;
#[cfg(feature = "std")]
pub use registry::{process_allocator, set_process_allocator, set_thread_allocator, thread_allocator};

// Re-export proc-macros
pub use macros::{allocator, caps};

/// Common items for declaring, checking and wrapping allocators.
pub mod prelude {
    pub use crate::adapter::{wrap, wrap_copied, AllocatorHandle, Storage};
    pub use crate::caps::{Capabilities, CapabilitySet, NoFailureTracking, SharedInstance, SharedMemory};
    pub use crate::heap::GlobalHeap;
    pub use crate::interface::AllocatorInterface;
    pub use crate::primitives::{ByteSpan, SharedSpan, Span, Ternary, TypeTag};
    pub use crate::protocol::Allocator;
    pub use macros::{allocator, caps};
    // Note: inspect!, compatible!, with!, union! are #[macro_export] so they're at crate root
}
