//! The generated allocator interface.

use crate::caps::Capabilities;
use crate::primitives::{TypeTag, Ternary};

/// Operation surface of an allocator interface for the capability set `C`.
///
/// Consumers only ever see this trait through `C::Interface`, which adds
/// `Send + Sync` when `C` carries `SharedInstance`. Every span parameter and
/// result is a `C::Span`, so the memory discipline is fixed by `C` alone.
///
/// Failures are ordinary return values: a null span, `false`, or
/// `Ternary::Unknown`.
pub trait AllocatorInterface<C: Capabilities> {
    /// Allocates `size` bytes. `tag` is diagnostic only.
    fn allocate(&self, size: usize, tag: Option<TypeTag>) -> C::Span;

    /// Returns `span` to the allocator.
    ///
    /// # Safety
    ///
    /// `span` must have been produced by this allocator and still be live.
    unsafe fn deallocate(&self, span: C::Span) -> bool;

    /// Allocates `size` bytes aligned to `alignment`.
    fn aligned_allocate(&self, size: usize, alignment: usize) -> C::Span;

    /// Allocates everything the allocator has left.
    fn allocate_all(&self) -> C::Span;

    /// Grows `span` in place to `new_size` bytes.
    ///
    /// # Safety
    ///
    /// `span` must have been produced by this allocator and still be live.
    unsafe fn expand(&self, span: &mut C::Span, new_size: usize) -> bool;

    /// Resizes `span` to `new_size` bytes, moving it if needed.
    ///
    /// # Safety
    ///
    /// `span` must be null or produced by this allocator and still live.
    unsafe fn reallocate(&self, span: &mut C::Span, new_size: usize) -> bool;

    /// Resizes `span`, keeping it aligned to `alignment`.
    ///
    /// # Safety
    ///
    /// As for [`AllocatorInterface::reallocate`].
    unsafe fn aligned_reallocate(&self, span: &mut C::Span, new_size: usize, alignment: usize) -> bool;

    /// Releases every outstanding span at once.
    ///
    /// # Safety
    ///
    /// No span produced by this allocator may be used afterwards.
    unsafe fn deallocate_all(&self) -> bool;

    /// Minimum alignment of every span handed out.
    fn alignment(&self) -> usize;

    /// Size the allocator would actually reserve for a `size`-byte request.
    fn good_alloc_size(&self, size: usize) -> usize;

    fn owns(&self, span: C::Span) -> Ternary;

    /// Finds the live span containing `ptr`, storing it in `out`.
    fn resolve_internal_pointer(&self, ptr: *const u8, out: &mut C::Span) -> Ternary;

    /// Whether the allocator currently has no live spans.
    fn empty(&self) -> Ternary;
}
