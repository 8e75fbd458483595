//! # Layer 7: Stock Allocator
//!
//! [`GlobalHeap`] forwards to the process global allocator. It is the
//! allocator behind both default registry slots and the simplest example of
//! a stateless, shareable, untracked allocator.

use alloc::alloc::{alloc, dealloc, realloc, Layout};

use macros::allocator;

use crate::interface::PLATFORM_ALIGNMENT;
use crate::primitives::{ByteSpan, Span, TypeTag};

/// The process global allocator as a zero-sized [`Allocator`].
///
/// Every block is aligned to [`PLATFORM_ALIGNMENT`], which is also the
/// strongest alignment `aligned_allocate` honours. Zero-size requests fail.
///
/// [`Allocator`]: crate::Allocator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GlobalHeap;

#[inline]
fn layout(size: usize) -> Option<Layout> {
    if size == 0 {
        return None;
    }
    Layout::from_size_align(size, PLATFORM_ALIGNMENT).ok()
}

#[inline]
fn serves(alignment: usize) -> bool {
    alignment.is_power_of_two() && alignment <= PLATFORM_ALIGNMENT
}

// SAFETY: spans come straight from the global allocator and stay live until
// handed back through `deallocate` or `reallocate`.
#[allocator]
unsafe impl GlobalHeap {
    #[untracked]
    fn allocate(&self, size: usize, _tag: Option<TypeTag>) -> ByteSpan {
        let Some(layout) = layout(size) else { return ByteSpan::NULL };
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc(layout) };
        if ptr.is_null() { ByteSpan::NULL } else { ByteSpan::new(ptr, size) }
    }

    #[untracked]
    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        if span.is_null() {
            return true;
        }
        let Some(layout) = layout(span.len()) else { return false };
        // SAFETY: the caller hands back a live span from this allocator, and
        // every such span was allocated with exactly this layout.
        unsafe { dealloc(span.as_ptr(), layout) };
        true
    }

    #[untracked]
    fn aligned_allocate(&self, size: usize, alignment: usize) -> ByteSpan {
        if !serves(alignment) {
            return ByteSpan::NULL;
        }
        self.allocate(size, None)
    }

    #[untracked]
    unsafe fn reallocate(&self, span: &mut ByteSpan, new_size: usize) -> bool {
        if span.is_null() {
            *span = self.allocate(new_size, None);
            return !span.is_null();
        }
        if new_size == 0 {
            // SAFETY: forwarded from the caller.
            let released = unsafe { self.deallocate(*span) };
            if released {
                *span = ByteSpan::NULL;
            }
            return released;
        }
        let (Some(old), Some(_)) = (layout(span.len()), layout(new_size)) else { return false };
        // SAFETY: `span` was allocated with `old`; the new size is non-zero
        // and forms a valid layout at the same alignment.
        let ptr = unsafe { realloc(span.as_ptr(), old, new_size) };
        if ptr.is_null() {
            return false;
        }
        *span = ByteSpan::new(ptr, new_size);
        true
    }

    #[untracked]
    unsafe fn aligned_reallocate(&self, span: &mut ByteSpan, new_size: usize, alignment: usize) -> bool {
        // SAFETY: forwarded from the caller.
        serves(alignment) && unsafe { self.reallocate(span, new_size) }
    }

    #[untracked]
    fn alignment(&self) -> usize {
        PLATFORM_ALIGNMENT
    }

    #[untracked]
    fn good_alloc_size(&self, size: usize) -> usize {
        size.checked_next_multiple_of(PLATFORM_ALIGNMENT).unwrap_or(size)
    }
}
