//! # Layer 8: Default Allocators
//!
//! Two well-known slots, each holding a handle over [`GlobalHeap`] until
//! replaced:
//!
//! | Slot    | Capability set          | Scope            |
//! |---------|-------------------------|------------------|
//! | thread  | `caps![]`               | current thread   |
//! | process | `caps![SharedInstance]` | whole process    |
//!
//! Both slots always hold a handle, so reading never fails. A replacement
//! is a handle by value, which rules out a null or empty slot by
//! construction.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use macros::caps;
use tracing::debug;

use crate::adapter::AllocatorHandle;
use crate::caps::Capabilities;
use crate::heap::GlobalHeap;

/// Capability set of the thread slot.
pub type ThreadCaps = caps![];

/// Capability set of the process slot.
pub type ProcessCaps = caps![SharedInstance];

thread_local! {
    static THREAD: RefCell<Rc<AllocatorHandle<ThreadCaps>>> =
        RefCell::new(Rc::new(AllocatorHandle::singleton(GlobalHeap)));
}

static PROCESS: LazyLock<ArcSwap<AllocatorHandle<ProcessCaps>>> =
    LazyLock::new(|| ArcSwap::from_pointee(AllocatorHandle::singleton(GlobalHeap)));

/// The current thread's default allocator.
pub fn thread_allocator() -> Rc<AllocatorHandle<ThreadCaps>> {
    THREAD.with(|slot| Rc::clone(&slot.borrow()))
}

/// Replaces the current thread's default allocator, returning the old one.
///
/// Handles already returned by [`thread_allocator`] keep the old allocator
/// alive until they are dropped.
pub fn set_thread_allocator(handle: AllocatorHandle<ThreadCaps>) -> Rc<AllocatorHandle<ThreadCaps>> {
    let caps = <ThreadCaps as Capabilities>::SET;
    debug!(storage = ?handle.storage(), %caps, "replacing thread default allocator");
    THREAD.with(|slot| slot.replace(Rc::new(handle)))
}

/// The process-wide default allocator.
pub fn process_allocator() -> Arc<AllocatorHandle<ProcessCaps>> {
    PROCESS.load_full()
}

/// Replaces the process-wide default allocator, returning the old one.
pub fn set_process_allocator(handle: AllocatorHandle<ProcessCaps>) -> Arc<AllocatorHandle<ProcessCaps>> {
    let caps = <ProcessCaps as Capabilities>::SET;
    debug!(storage = ?handle.storage(), %caps, "replacing process default allocator");
    PROCESS.swap(Arc::new(handle))
}
