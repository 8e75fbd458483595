//! # Layer 3: Allocator Protocol
//!
//! The minimal surface a concrete allocator exposes. `allocate` is the only
//! required operation; every other one has a body that returns the fixed
//! fallback listed by [`Operation::fallback`], so an omitted operation
//! degrades the same way for every caller and every call.
//!
//! Implement this trait through `#[allocator]` rather than by hand: the
//! attribute fills in [`Allocator::OPERATIONS`], [`Allocator::UNTRACKED`] and
//! [`Allocator::Untracked`] from the impl block itself, which is what the
//! capability inspector reads. The attribute only accepts `unsafe impl`
//! blocks, since the generated impl carries the contract below:
//!
//! ```compile_fail
//! use allocator_caps::prelude::*;
//!
//! struct Forged;
//!
//! #[allocator]
//! impl Forged {
//!     fn allocate(&self, size: usize) -> ByteSpan {
//!         ByteSpan::new(0x10 as *mut u8, size)
//!     }
//! }
//! ```
//!
//! [`Operation::fallback`]: crate::interface::Operation::fallback

use crate::interface::{Operations, PLATFORM_ALIGNMENT};
use crate::primitives::{Bool, Span, Ternary, TypeTag};

/// A concrete allocator.
///
/// # Safety
///
/// Implementors promise that a non-null span returned by an allocating
/// operation names `len` bytes of writable memory that stays valid until it
/// is handed back through `deallocate`, `reallocate`, `aligned_reallocate`
/// or `deallocate_all`, and that [`Allocator::OPERATIONS`] and
/// [`Allocator::UNTRACKED`] describe the impl truthfully. Returned memory
/// must not lie inside the allocator value itself. Wrapping stores
/// the allocator inside memory it allocated, so a lying implementation is
/// undefined behaviour, not a logic error.
pub unsafe trait Allocator {
    /// Span type returned by `allocate`. Decides the `SharedMemory` fact.
    type Span: Span;

    /// `Present` when every operation in [`Allocator::OPERATIONS`] is
    /// untracked, `Absent` otherwise.
    type Untracked: Bool;

    /// Operations the allocator actually implements.
    const OPERATIONS: Operations;

    /// Operations marked `#[untracked]`. Always a subset of `OPERATIONS`.
    const UNTRACKED: Operations;

    fn allocate(&self, size: usize, tag: Option<TypeTag>) -> Self::Span;

    /// # Safety
    ///
    /// `span` must have come from this allocator and still be live.
    #[inline]
    unsafe fn deallocate(&self, span: Self::Span) -> bool {
        let _ = span;
        false
    }

    #[inline]
    fn aligned_allocate(&self, size: usize, alignment: usize) -> Self::Span {
        let _ = (size, alignment);
        <Self::Span as Span>::null()
    }

    #[inline]
    fn allocate_all(&self) -> Self::Span {
        <Self::Span as Span>::null()
    }

    /// # Safety
    ///
    /// `span` must have come from this allocator and still be live.
    #[inline]
    unsafe fn expand(&self, span: &mut Self::Span, new_size: usize) -> bool {
        let _ = (span, new_size);
        false
    }

    /// # Safety
    ///
    /// `span` must be null, or have come from this allocator and still be live.
    #[inline]
    unsafe fn reallocate(&self, span: &mut Self::Span, new_size: usize) -> bool {
        let _ = (span, new_size);
        false
    }

    /// # Safety
    ///
    /// As for [`Allocator::reallocate`].
    #[inline]
    unsafe fn aligned_reallocate(&self, span: &mut Self::Span, new_size: usize, alignment: usize) -> bool {
        let _ = (span, new_size, alignment);
        false
    }

    /// # Safety
    ///
    /// No span from this allocator may be used afterwards.
    #[inline]
    unsafe fn deallocate_all(&self) -> bool {
        false
    }

    #[inline]
    fn alignment(&self) -> usize {
        PLATFORM_ALIGNMENT
    }

    /// Rounds `size` up to a multiple of `alignment()`. Saturates to `size`
    /// when rounding would overflow.
    #[inline]
    fn good_alloc_size(&self, size: usize) -> usize {
        match self.alignment() {
            0 => size,
            align => size.checked_next_multiple_of(align).unwrap_or(size),
        }
    }

    #[inline]
    fn owns(&self, span: Self::Span) -> Ternary {
        let _ = span;
        Ternary::Unknown
    }

    #[inline]
    fn resolve_internal_pointer(&self, ptr: *const u8, out: &mut Self::Span) -> Ternary {
        let _ = (ptr, out);
        Ternary::Unknown
    }

    #[inline]
    fn empty(&self) -> Ternary {
        Ternary::Unknown
    }
}
