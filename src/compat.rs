//! # Layer 5: Compatibility Checker
//!
//! Decides whether a concrete allocator may serve a requested capability
//! set. Each flag is judged on its own and every rule must pass:
//!
//! | Flag              | Rule                                                  |
//! |-------------------|-------------------------------------------------------|
//! | SharedMemory      | span type equals the requested one, both directions   |
//! | NoFailureTracking | required: all present operations untracked            |
//! | SharedInstance    | required: `Send + Sync`                               |
//!
//! A flag that is not requested is never checked, so stronger allocators
//! serve weaker requests. An existing `AllocatorHandle<S>` is opaque and
//! only serves `S` itself.
//!
//! The check happens at compile time through [`Compatible`]. A rejected
//! configuration never produces a value:
//!
//! ```compile_fail
//! use allocator_caps::{caps, wrap, AllocatorHandle, GlobalHeap};
//!
//! // GlobalHeap hands out exclusive spans.
//! let _: AllocatorHandle<caps![SharedMemory]> = wrap(GlobalHeap).unwrap();
//! ```
//!
//! ```compile_fail
//! use allocator_caps::{allocator, caps, wrap, AllocatorHandle, ByteSpan, TypeTag};
//!
//! struct Tracked;
//!
//! #[allocator]
//! unsafe impl Tracked {
//!     #[untracked]
//!     fn allocate(&self, _size: usize, _tag: Option<TypeTag>) -> ByteSpan {
//!         ByteSpan::NULL
//!     }
//!
//!     unsafe fn expand(&self, _span: &mut ByteSpan, _new_size: usize) -> bool {
//!         false
//!     }
//! }
//!
//! let _: AllocatorHandle<caps![NoFailureTracking]> = wrap(Tracked).unwrap();
//! ```
//!
//! ```compile_fail
//! use allocator_caps::{caps, wrap, AllocatorHandle, GlobalHeap};
//!
//! let inner: AllocatorHandle<caps![SharedInstance]> = wrap(GlobalHeap).unwrap();
//! // Handles are never re-erased under a different set.
//! let _: AllocatorHandle<caps![]> = wrap(inner).unwrap();
//! ```
//!
//! [`check`] mirrors the same rules at runtime over an [`Inspection`] and
//! names the first rule that fails.

use core::ptr::NonNull;

use crate::adapter::{Adapter, AllocatorHandle};
use crate::caps::{CapabilitySet, Capabilities, Caps};
use crate::detect::Inspection;
use crate::error::{Incompatibility, WrapError};
use crate::primitives::{Absent, Present, SpanKind};
use crate::protocol::Allocator;

/// `Self` may be erased behind the interface generated for `C`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot serve an allocator interface for `{C}`",
    label = "incompatible allocator",
    note = "SharedMemory must match the span type of `allocate` exactly",
    note = "NoFailureTracking requires every operation to be #[untracked]; SharedInstance requires Send + Sync"
)]
pub trait Compatible<C: Capabilities>: Allocator<Span = C::Span> + Sized + 'static {
    #[doc(hidden)]
    fn erase(adapter: NonNull<Adapter<Self, C>>) -> NonNull<C::Interface>;
}

macro_rules! compatible_rows {
    ($([$nt:ident, $sm:ident, $si:ident] => { $($bound:tt)* })*) => {
        $(
            impl<A> Compatible<Caps<$nt, $sm, $si>> for A
            where
                A: Allocator<Span = <Caps<$nt, $sm, $si> as Capabilities>::Span> + 'static $($bound)*
            {
                #[inline]
                fn erase(
                    adapter: NonNull<Adapter<A, Caps<$nt, $sm, $si>>>,
                ) -> NonNull<<Caps<$nt, $sm, $si> as Capabilities>::Interface> {
                    adapter
                }
            }
        )*
    };
}

compatible_rows! {
    [Absent, Absent, Absent] => {}
    [Present, Absent, Absent] => { + Allocator<Untracked = Present> }
    [Absent, Present, Absent] => {}
    [Present, Present, Absent] => { + Allocator<Untracked = Present> }
    [Absent, Absent, Present] => { + Send + Sync }
    [Present, Absent, Present] => { + Allocator<Untracked = Present> + Send + Sync }
    [Absent, Present, Present] => { + Send + Sync }
    [Present, Present, Present] => { + Allocator<Untracked = Present> + Send + Sync }
}

/// Anything `wrap` accepts for `C`: a compatible allocator, or a handle
/// already erased for exactly `C`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be wrapped as an allocator interface for `{C}`",
    note = "an existing AllocatorHandle only serves the capability set it was built for"
)]
pub trait Wrap<C: Capabilities>: Sized {
    fn into_handle(self) -> Result<AllocatorHandle<C>, WrapError>;
}

impl<A: Compatible<C>, C: Capabilities> Wrap<C> for A {
    #[inline]
    fn into_handle(self) -> Result<AllocatorHandle<C>, WrapError> {
        AllocatorHandle::new(self)
    }
}

impl<C: Capabilities> Wrap<C> for AllocatorHandle<C> {
    #[inline]
    fn into_handle(self) -> Result<AllocatorHandle<C>, WrapError> {
        Ok(self)
    }
}

/// Runtime mirror of [`Compatible`].
pub fn check(inspection: &Inspection, requested: CapabilitySet) -> Result<(), Incompatibility> {
    let wanted = if requested.shared_memory() { SpanKind::Shared } else { SpanKind::Exclusive };
    if inspection.span() != wanted {
        return Err(Incompatibility::SpanMismatch {
            requested: wanted,
            provided: inspection.span(),
        });
    }
    if requested.no_failure_tracking() && !inspection.no_failure_tracking() {
        return Err(Incompatibility::FailureTracked {
            operations: inspection.tracked(),
        });
    }
    if requested.shared_instance() && !inspection.shared_instance() {
        return Err(Incompatibility::NotShareable);
    }
    Ok(())
}

/// Runtime mirror of [`Wrap`] for handles: erasure is opaque, so only an
/// exact match passes.
pub fn check_erased(provided: CapabilitySet, requested: CapabilitySet) -> Result<(), Incompatibility> {
    if provided == requested {
        Ok(())
    } else {
        Err(Incompatibility::ErasedMismatch { requested, provided })
    }
}

/// Answers the compile-time compatibility question for a concrete type as
/// a `bool`, without failing the build.
///
/// ```
/// use allocator_caps::{caps, compatible, GlobalHeap};
///
/// assert!(compatible!(GlobalHeap, caps![NoFailureTracking, SharedInstance]));
/// assert!(!compatible!(GlobalHeap, caps![SharedMemory]));
/// ```
#[macro_export]
macro_rules! compatible {
    ($ty:ty, $caps:ty) => {{
        #[allow(unused_imports)]
        use $crate::detect::autoref::CompatibleFallback as _;
        $crate::detect::Detect::<($ty, $caps)>::IS_COMPATIBLE
    }};
}
