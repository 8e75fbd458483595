//! Owning handle to an erased allocator interface.

use core::any::TypeId;
use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::Deref;
use core::ptr::NonNull;

use crate::caps::Capabilities;
use crate::compat::Compatible;
use crate::error::WrapError;

use super::storage;

/// How a handle holds its adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// Zero-sized allocator: one adapter per type for the whole process.
    Singleton,
    /// A clone of the caller's allocator, stored in a block it allocated.
    ///
    /// The block is taken from the caller's instance but returned through
    /// the clone's `deallocate`. That holds for allocators whose clones share
    /// one pool; allocators whose clones own independent pools must be moved
    /// in with [`wrap`](crate::wrap) instead.
    OwnedCopy,
    /// The caller's allocator moved into a block it allocated.
    OwnedMoved,
}

/// Frees an owned adapter block: moves the allocator out, returns the block
/// through its `deallocate`, drops the allocator.
pub(super) type Release = unsafe fn(NonNull<u8>, usize) -> bool;

pub(super) enum Backing {
    Singleton,
    Block {
        storage: Storage,
        len: usize,
        release: Release,
    },
}

/// A type-erased allocator serving the interface generated for `C`.
///
/// Dereferences to `C::Interface`; nothing about the wrapped type is
/// reachable through it. Dropping an owned handle releases its block
/// through the wrapped allocator, see [`AllocatorHandle::dispose`].
pub struct AllocatorHandle<C: Capabilities> {
    interface: NonNull<C::Interface>,
    backing: Backing,
    adapter: TypeId,
}

// SAFETY: the handle owns its adapter exclusively (or shares an immortal
// singleton), so it is exactly as thread-safe as the interface it exposes.
// `C::Interface` is `Send + Sync` only when `Compatible<C>` demanded
// `Send + Sync` of the wrapped allocator.
unsafe impl<C: Capabilities> Send for AllocatorHandle<C> where C::Interface: Send {}
// SAFETY: see above.
unsafe impl<C: Capabilities> Sync for AllocatorHandle<C> where C::Interface: Sync {}

impl<C: Capabilities> AllocatorHandle<C> {
    /// Takes ownership of `allocator`.
    ///
    /// Zero-sized allocators go to [`Storage::Singleton`], anything else to
    /// [`Storage::OwnedMoved`].
    pub fn new<A: Compatible<C>>(allocator: A) -> Result<Self, WrapError> {
        if mem::size_of::<A>() == 0 {
            Ok(storage::singleton(allocator))
        } else {
            storage::owned_moved(allocator)
        }
    }

    /// Wraps a clone of `allocator`.
    ///
    /// Zero-sized allocators go to [`Storage::Singleton`], anything else to
    /// [`Storage::OwnedCopy`].
    pub fn new_copied<A: Compatible<C> + Clone>(allocator: &A) -> Result<Self, WrapError> {
        if mem::size_of::<A>() == 0 {
            Ok(storage::singleton(allocator.clone()))
        } else {
            storage::owned_copy(allocator)
        }
    }

    /// Wraps a zero-sized allocator. Cannot fail; rejected at compile time
    /// for types that carry state.
    pub fn singleton<A: Compatible<C>>(allocator: A) -> Self {
        const {
            assert!(
                mem::size_of::<A>() == 0,
                "AllocatorHandle::singleton requires a zero-sized allocator"
            )
        };
        storage::singleton(allocator)
    }

    pub(super) fn from_parts(interface: NonNull<C::Interface>, backing: Backing, adapter: TypeId) -> Self {
        Self { interface, backing, adapter }
    }

    pub fn storage(&self) -> Storage {
        match self.backing {
            Backing::Singleton => Storage::Singleton,
            Backing::Block { storage, .. } => storage,
        }
    }

    /// True when both handles reach the same adapter instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.adapter == other.adapter && core::ptr::addr_eq(this.interface.as_ptr(), other.interface.as_ptr())
    }

    /// Releases the handle, reporting whether the wrapped allocator took
    /// its block back.
    ///
    /// Singletons are never released and report `true`. An allocator
    /// without `deallocate` leaks its block and reports `false`.
    pub fn dispose(self) -> bool {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never used or dropped again.
        unsafe { this.release() }
    }

    /// # Safety
    ///
    /// Must run at most once, and the handle must not be used afterwards.
    unsafe fn release(&self) -> bool {
        match self.backing {
            Backing::Singleton => true,
            Backing::Block { len, release, .. } => unsafe { release(self.interface.cast::<u8>(), len) },
        }
    }
}

impl<C: Capabilities> Deref for AllocatorHandle<C> {
    type Target = C::Interface;

    #[inline]
    fn deref(&self) -> &C::Interface {
        // SAFETY: the adapter lives until the handle releases it.
        unsafe { self.interface.as_ref() }
    }
}

impl<C: Capabilities> Drop for AllocatorHandle<C> {
    fn drop(&mut self) {
        // SAFETY: drop runs once and the handle is gone afterwards.
        unsafe {
            self.release();
        }
    }
}

impl<C: Capabilities> fmt::Debug for AllocatorHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocatorHandle")
            .field("caps", &C::SET)
            .field("storage", &self.storage())
            .field("adapter", &self.interface.cast::<u8>())
            .finish()
    }
}
