//! Storage strategies for adapters.

use alloc::collections::BTreeSet;
use core::alloc::Layout;
use core::any::{type_name, TypeId};
use core::mem::{self, MaybeUninit};
use core::ptr::{self, NonNull};
use core::sync::atomic::{compiler_fence, Ordering};

use tracing::trace;

use crate::caps::Capabilities;
use crate::compat::Compatible;
use crate::error::WrapError;
use crate::interface::Operations;
use crate::primitives::{Bool, Span, TypeTag};
use crate::protocol::Allocator;

use super::handle::{AllocatorHandle, Backing, Storage};
use super::Adapter;

/// Adapter types whose singleton has been constructed.
static CONSTRUCTED: spin::Mutex<BTreeSet<TypeId>> = spin::Mutex::new(BTreeSet::new());

/// Rejects `Allocator` impls whose metadata contradicts itself.
const fn audit<A: Allocator>() {
    assert!(
        A::OPERATIONS.contains(Operations::ALLOCATE),
        "Allocator::OPERATIONS must contain ALLOCATE"
    );
    assert!(
        A::OPERATIONS.contains(A::UNTRACKED),
        "Allocator::UNTRACKED must be a subset of OPERATIONS"
    );
    assert!(
        <A::Untracked as Bool>::VALUE == A::UNTRACKED.contains(A::OPERATIONS),
        "Allocator::Untracked disagrees with UNTRACKED"
    );
}

pub(super) fn singleton<A: Compatible<C>, C: Capabilities>(allocator: A) -> AllocatorHandle<C> {
    const { audit::<A>() };
    let slot = NonNull::<Adapter<A, C>>::dangling();
    let key = TypeId::of::<Adapter<A, C>>();

    let spare = {
        let mut constructed = CONSTRUCTED.lock();
        if constructed.insert(key) {
            // SAFETY: `Adapter<A, C>` is zero-sized, so any aligned non-null
            // pointer is valid for the write. The value is never dropped.
            unsafe { slot.as_ptr().write(Adapter::new(allocator)) };
            trace!(allocator = type_name::<A>(), caps = %C::SET, "constructed singleton adapter");
            None
        } else {
            Some(allocator)
        }
    };
    // Dropped outside the lock in case the allocator's Drop wraps again.
    drop(spare);

    AllocatorHandle::from_parts(A::erase(slot), Backing::Singleton, key)
}

/// A block acquired from the allocator being wrapped.
struct Block<S> {
    ptr: NonNull<u8>,
    span: S,
}

fn acquire<A: Allocator, T>(allocator: &A) -> Result<Block<A::Span>, WrapError> {
    let layout = Layout::new::<T>();
    let span = if A::OPERATIONS.contains(Operations::ALIGNED_ALLOCATE) {
        allocator.aligned_allocate(layout.size(), layout.align())
    } else {
        allocator.allocate(layout.size(), Some(TypeTag::of::<T>()))
    };

    let ptr = match NonNull::new(span.as_ptr()) {
        Some(ptr) if span.len() >= layout.size() => ptr,
        Some(_) => {
            // SAFETY: the span was just produced by this allocator.
            unsafe { allocator.deallocate(span) };
            return Err(WrapError::BlockUnavailable { size: layout.size(), align: layout.align() });
        }
        None => return Err(WrapError::BlockUnavailable { size: layout.size(), align: layout.align() }),
    };
    if ptr.as_ptr().addr() % layout.align() != 0 {
        // SAFETY: as above.
        unsafe { allocator.deallocate(span) };
        return Err(WrapError::MisalignedBlock { addr: ptr.as_ptr().addr(), align: layout.align() });
    }
    Ok(Block { ptr, span })
}

/// Hands a block back unless disarmed.
struct BlockGuard<'a, A: Allocator> {
    allocator: &'a A,
    span: Option<A::Span>,
}

impl<A: Allocator> BlockGuard<'_, A> {
    fn disarm(mut self) {
        self.span = None;
    }
}

impl<A: Allocator> Drop for BlockGuard<'_, A> {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            // SAFETY: the span came from this allocator and holds nothing yet.
            unsafe { self.allocator.deallocate(span) };
        }
    }
}

unsafe fn release<A: Allocator, C>(block: NonNull<u8>, len: usize) -> bool {
    // SAFETY: `block` holds an initialized adapter that nothing else reads
    // again once it is moved out here.
    let allocator = unsafe { block.cast::<Adapter<A, C>>().as_ptr().read() }.into_inner();
    let span = <A::Span as Span>::from_raw_parts(block.as_ptr(), len);
    // SAFETY: the span is the block this allocator handed out for the adapter.
    let released = unsafe { allocator.deallocate(span) };
    trace!(allocator = type_name::<A>(), released, "released adapter block");
    released
}

pub(super) fn owned_copy<A: Compatible<C> + Clone, C: Capabilities>(allocator: &A) -> Result<AllocatorHandle<C>, WrapError> {
    const { audit::<A>() };
    let block = acquire::<A, Adapter<A, C>>(allocator)?;
    let guard = BlockGuard { allocator, span: Some(block.span) };
    let adapter = Adapter::<A, C>::new(allocator.clone());
    guard.disarm();

    let slot = block.ptr.cast::<Adapter<A, C>>();
    // SAFETY: `acquire` checked size and alignment for `Adapter<A, C>`, and
    // the `Allocator` contract makes the block writable memory of its own.
    unsafe { slot.as_ptr().write(adapter) };
    trace!(allocator = type_name::<A>(), caps = %C::SET, len = block.span.len(), "copied allocator into its own block");

    Ok(AllocatorHandle::from_parts(
        A::erase(slot),
        Backing::Block { storage: Storage::OwnedCopy, len: block.span.len(), release: release::<A, C> },
        TypeId::of::<Adapter<A, C>>(),
    ))
}

pub(super) fn owned_moved<A: Compatible<C>, C: Capabilities>(allocator: A) -> Result<AllocatorHandle<C>, WrapError> {
    const { audit::<A>() };
    let mut staged = MaybeUninit::new(Adapter::<A, C>::new(allocator));

    // SAFETY: `staged` was initialized above.
    let block = match acquire::<A, Adapter<A, C>>(unsafe { staged.assume_init_ref() }.get()) {
        Ok(block) => block,
        Err(err) => {
            // SAFETY: still initialized, and not used again.
            unsafe { staged.assume_init_drop() };
            return Err(err);
        }
    };

    let slot = block.ptr.cast::<Adapter<A, C>>();
    // SAFETY: `acquire` checked size and alignment. The `Allocator` contract
    // keeps handed-out memory outside the allocator value, so the block does
    // not overlap `staged`.
    unsafe { ptr::copy_nonoverlapping(staged.as_ptr(), slot.as_ptr(), 1) };
    scrub(&mut staged);
    trace!(allocator = type_name::<A>(), caps = %C::SET, len = block.span.len(), "moved allocator into its own block");

    Ok(AllocatorHandle::from_parts(
        A::erase(slot),
        Backing::Block { storage: Storage::OwnedMoved, len: block.span.len(), release: release::<A, C> },
        TypeId::of::<Adapter<A, C>>(),
    ))
}

/// Zero-fills a moved-from stack slot so no copy of its state outlives the move.
fn scrub<T>(slot: &mut MaybeUninit<T>) {
    let base = slot.as_mut_ptr().cast::<u8>();
    for offset in 0..mem::size_of::<T>() {
        // SAFETY: in bounds of `slot`; volatile so the stores survive even
        // though the slot is dead afterwards.
        unsafe { base.add(offset).write_volatile(0) };
    }
    compiler_fence(Ordering::SeqCst);
}
