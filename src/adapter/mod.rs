//! # Layer 6: Adapter Factory
//!
//! Type-erases a concrete allocator behind the interface generated for a
//! capability set.
//!
//! ```text
//! wrap(allocator) ──> Compatible<C>? ──no──> compile error
//!                          │ yes
//!                          v
//!              already AllocatorHandle<C>? ──yes──> returned unchanged
//!                          │ no
//!                          v
//!        zero-sized ──> Singleton    (one adapter per type, never freed)
//!        wrap_copied ─> OwnedCopy    (clone written into a block it allocated)
//!        wrap ────────> OwnedMoved   (moved into a block it allocated,
//!                                     stack copy zero-filled)
//! ```
//!
//! One `Adapter<A, C>` type exists per (allocator, capability set) pair.
//! Its forwarding is fixed by monomorphization: an operation the allocator
//! omits resolves to the `Allocator` default body once, at compile time.

mod handle;
mod storage;

use core::marker::PhantomData;

use crate::caps::Capabilities;
use crate::compat::{Compatible, Wrap};
use crate::error::WrapError;
use crate::interface::AllocatorInterface;
use crate::primitives::{Ternary, TypeTag};
use crate::protocol::Allocator;

pub use handle::{AllocatorHandle, Storage};

/// Forwards the generated interface for `C` to `A`.
///
/// Only ever observed behind an [`AllocatorHandle`].
#[doc(hidden)]
#[repr(C)]
pub struct Adapter<A, C> {
    allocator: A,
    caps: PhantomData<fn() -> C>,
}

impl<A, C> Adapter<A, C> {
    #[inline]
    pub(crate) const fn new(allocator: A) -> Self {
        Self { allocator, caps: PhantomData }
    }

    #[inline]
    pub(crate) fn into_inner(self) -> A {
        self.allocator
    }

    #[inline]
    pub(crate) fn get(&self) -> &A {
        &self.allocator
    }
}

impl<A, C> AllocatorInterface<C> for Adapter<A, C>
where
    C: Capabilities,
    A: Allocator<Span = C::Span>,
{
    #[inline]
    fn allocate(&self, size: usize, tag: Option<TypeTag>) -> C::Span {
        self.allocator.allocate(size, tag)
    }

    #[inline]
    unsafe fn deallocate(&self, span: C::Span) -> bool {
        unsafe { self.allocator.deallocate(span) }
    }

    #[inline]
    fn aligned_allocate(&self, size: usize, alignment: usize) -> C::Span {
        self.allocator.aligned_allocate(size, alignment)
    }

    #[inline]
    fn allocate_all(&self) -> C::Span {
        self.allocator.allocate_all()
    }

    #[inline]
    unsafe fn expand(&self, span: &mut C::Span, new_size: usize) -> bool {
        unsafe { self.allocator.expand(span, new_size) }
    }

    #[inline]
    unsafe fn reallocate(&self, span: &mut C::Span, new_size: usize) -> bool {
        unsafe { self.allocator.reallocate(span, new_size) }
    }

    #[inline]
    unsafe fn aligned_reallocate(&self, span: &mut C::Span, new_size: usize, alignment: usize) -> bool {
        unsafe { self.allocator.aligned_reallocate(span, new_size, alignment) }
    }

    #[inline]
    unsafe fn deallocate_all(&self) -> bool {
        unsafe { self.allocator.deallocate_all() }
    }

    #[inline]
    fn alignment(&self) -> usize {
        self.allocator.alignment()
    }

    #[inline]
    fn good_alloc_size(&self, size: usize) -> usize {
        self.allocator.good_alloc_size(size)
    }

    #[inline]
    fn owns(&self, span: C::Span) -> Ternary {
        self.allocator.owns(span)
    }

    #[inline]
    fn resolve_internal_pointer(&self, ptr: *const u8, out: &mut C::Span) -> Ternary {
        self.allocator.resolve_internal_pointer(ptr, out)
    }

    #[inline]
    fn empty(&self) -> Ternary {
        self.allocator.empty()
    }
}

/// Erases `allocator` behind the interface generated for `C`.
///
/// Zero-sized allocators become the process-wide singleton for their type;
/// anything else is moved into a block it allocates for itself. Passing an
/// `AllocatorHandle<C>` returns it unchanged.
///
/// ```
/// use allocator_caps::{caps, wrap, AllocatorHandle, GlobalHeap, Span};
///
/// let heap: AllocatorHandle<caps![NoFailureTracking]> = wrap(GlobalHeap).unwrap();
/// let span = heap.allocate(1, None);
/// assert!(!span.is_null() && span.len() >= 1);
/// assert!(unsafe { heap.deallocate(span) });
/// ```
#[inline]
pub fn wrap<C: Capabilities, A: Wrap<C>>(allocator: A) -> Result<AllocatorHandle<C>, WrapError> {
    allocator.into_handle()
}

/// Erases a copy of `allocator`, leaving the original with the caller.
#[inline]
pub fn wrap_copied<C: Capabilities, A: Compatible<C> + Clone>(allocator: &A) -> Result<AllocatorHandle<C>, WrapError> {
    AllocatorHandle::new_copied(allocator)
}
