//! Adapter factory: storage strategies, degradation defaults, disposal.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use allocator_caps::detect::autoref::SharedInstanceFallback;
use allocator_caps::detect::Detect;
use allocator_caps::prelude::*;
use allocator_caps::{WrapError, PLATFORM_ALIGNMENT};

// ============================================================================
// Allocators
// ============================================================================

/// Copyable, stateful: refuses requests above `limit`.
#[derive(Clone, Copy)]
struct Capped {
    limit: usize,
}

#[allocator]
unsafe impl Capped {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        if size > self.limit {
            return ByteSpan::NULL;
        }
        GlobalHeap.allocate(size, None)
    }

    #[untracked]
    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        if span.len() > self.limit {
            return false;
        }
        unsafe { GlobalHeap.deallocate(span) }
    }
}

/// Move-only, counts drops.
struct Counted {
    drops: Arc<AtomicUsize>,
    frees: Arc<AtomicUsize>,
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[allocator]
unsafe impl Counted {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }

    #[untracked]
    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        self.frees.fetch_add(1, Ordering::SeqCst);
        unsafe { GlobalHeap.deallocate(span) }
    }
}

/// Only `allocate`; never takes memory back.
struct Leaky {
    _state: u64,
}

#[allocator]
unsafe impl Leaky {
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }
}

/// Always out of memory.
struct Exhausted {
    _state: u64,
}

#[allocator]
unsafe impl Exhausted {
    fn allocate(&self, _size: usize) -> ByteSpan {
        ByteSpan::NULL
    }
}

/// Returns blocks one byte past an aligned address.
struct Skewed {
    released: Arc<AtomicUsize>,
}

#[allocator]
unsafe impl Skewed {
    fn allocate(&self, size: usize) -> ByteSpan {
        let span = GlobalHeap.allocate(size + 1, None);
        ByteSpan::new(span.as_ptr().wrapping_add(1), size)
    }

    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        self.released.fetch_add(1, Ordering::SeqCst);
        let base = ByteSpan::new(span.as_ptr().wrapping_sub(1), span.len() + 1);
        unsafe { GlobalHeap.deallocate(base) }
    }
}

/// Prefers `aligned_allocate`; records which primitive was used.
struct Aligned {
    aligned_calls: Arc<AtomicUsize>,
}

#[allocator]
unsafe impl Aligned {
    fn allocate(&self, _size: usize) -> ByteSpan {
        ByteSpan::NULL
    }

    fn aligned_allocate(&self, size: usize, alignment: usize) -> ByteSpan {
        self.aligned_calls.fetch_add(1, Ordering::SeqCst);
        GlobalHeap.aligned_allocate(size, alignment)
    }

    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        unsafe { GlobalHeap.deallocate(span) }
    }
}

/// Clones by panicking; counts blocks handed back.
struct Fragile {
    frees: Arc<AtomicUsize>,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        panic!("Fragile cannot be cloned");
    }
}

#[allocator]
unsafe impl Fragile {
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }

    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        self.frees.fetch_add(1, Ordering::SeqCst);
        unsafe { GlobalHeap.deallocate(span) }
    }
}

static SPARE_DROPS: AtomicUsize = AtomicUsize::new(0);

/// Zero-sized, counts dropped instances.
struct Stateless;

impl Drop for Stateless {
    fn drop(&mut self) {
        SPARE_DROPS.fetch_add(1, Ordering::SeqCst);
    }
}

#[allocator]
unsafe impl Stateless {
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }
}

// ============================================================================
// Storage strategies
// ============================================================================

#[test]
fn stateless_allocator_wraps_to_one_instance() {
    let first: AllocatorHandle<caps![NoFailureTracking]> = wrap(GlobalHeap).unwrap();
    let second: AllocatorHandle<caps![NoFailureTracking]> = wrap(GlobalHeap).unwrap();
    let copied: AllocatorHandle<caps![NoFailureTracking]> = wrap_copied(&GlobalHeap).unwrap();

    assert_eq!(first.storage(), Storage::Singleton);
    assert_eq!(copied.storage(), Storage::Singleton);
    assert!(AllocatorHandle::ptr_eq(&first, &second));
    assert!(AllocatorHandle::ptr_eq(&first, &copied));
}

#[test]
fn singleton_constructor_reuses_the_instance() {
    let plain: AllocatorHandle<caps![]> = AllocatorHandle::singleton(GlobalHeap);
    let again: AllocatorHandle<caps![]> = AllocatorHandle::singleton(GlobalHeap);
    assert!(AllocatorHandle::ptr_eq(&plain, &again));
    assert!(plain.dispose());
    assert_eq!(again.storage(), Storage::Singleton);
}

#[test]
fn concurrent_first_use_constructs_one_singleton() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));
    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let handle: AllocatorHandle<caps![]> = wrap(Stateless).unwrap();
                assert_eq!(handle.storage(), Storage::Singleton);
                let span = handle.allocate(16, None);
                assert!(!span.is_null());
                unsafe { GlobalHeap.deallocate(span) }
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().unwrap());
    }

    // One instance lives on as the singleton; every other one was a spare.
    assert_eq!(SPARE_DROPS.load(Ordering::SeqCst), THREADS - 1);
}

#[test]
fn copied_allocator_behaves_like_the_original() {
    let original = Capped { limit: 64 };
    let handle: AllocatorHandle<caps![NoFailureTracking]> = wrap_copied(&original).unwrap();
    assert_eq!(handle.storage(), Storage::OwnedCopy);

    for size in [1, 8, 64, 65, 4096] {
        let direct = Allocator::allocate(&original, size, None);
        let erased = handle.allocate(size, None);
        assert_eq!(direct.is_null(), erased.is_null(), "size {size}");
        assert_eq!(direct.len(), erased.len(), "size {size}");
        if !direct.is_null() {
            unsafe {
                direct.as_bytes_mut().fill(0xA5);
                erased.as_bytes_mut().fill(0xA5);
                assert_eq!(direct.as_bytes(), erased.as_bytes());
                assert_eq!(Allocator::deallocate(&original, direct), handle.deallocate(erased));
            }
        }
    }
    assert!(handle.dispose());
}

#[test]
fn moved_allocator_is_dropped_exactly_once() {
    let drops = Arc::new(AtomicUsize::new(0));
    let frees = Arc::new(AtomicUsize::new(0));
    let handle: AllocatorHandle<caps![NoFailureTracking]> = wrap(Counted {
        drops: Arc::clone(&drops),
        frees: Arc::clone(&frees),
    })
    .unwrap();

    assert_eq!(handle.storage(), Storage::OwnedMoved);
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    let span = handle.allocate(24, None);
    assert!(unsafe { handle.deallocate(span) });
    assert_eq!(frees.load(Ordering::SeqCst), 1);

    assert!(handle.dispose());
    assert_eq!(frees.load(Ordering::SeqCst), 2, "adapter block returned through deallocate");
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn dropping_a_handle_releases_its_block() {
    let drops = Arc::new(AtomicUsize::new(0));
    let frees = Arc::new(AtomicUsize::new(0));
    {
        let _handle: AllocatorHandle<caps![]> = wrap(Counted {
            drops: Arc::clone(&drops),
            frees: Arc::clone(&frees),
        })
        .unwrap();
    }
    assert_eq!(frees.load(Ordering::SeqCst), 1);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn existing_handle_passes_through_unchanged() {
    let handle: AllocatorHandle<caps![NoFailureTracking]> = wrap(Capped { limit: 16 }).unwrap();
    let before = &*handle as *const _ as *const u8;
    let again: AllocatorHandle<caps![NoFailureTracking]> = wrap(handle).unwrap();
    assert_eq!(&*again as *const _ as *const u8, before);
    assert_eq!(again.storage(), Storage::OwnedMoved);
}

#[test]
fn block_is_acquired_through_aligned_allocate_when_present() {
    let calls = Arc::new(AtomicUsize::new(0));
    let handle: AllocatorHandle<caps![]> = wrap(Aligned {
        aligned_calls: Arc::clone(&calls),
    })
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(handle.allocate(8, None).is_null());
}

// ============================================================================
// Construction failures
// ============================================================================

#[test]
fn missing_block_is_reported() {
    let err = wrap::<caps![], _>(Exhausted { _state: 0 }).unwrap_err();
    assert!(matches!(err, WrapError::BlockUnavailable { size: 8, align: 8 }), "{err}");
}

#[test]
fn misaligned_block_is_handed_back() {
    let released = Arc::new(AtomicUsize::new(0));
    let err = wrap::<caps![], _>(Skewed {
        released: Arc::clone(&released),
    })
    .unwrap_err();
    assert!(matches!(err, WrapError::MisalignedBlock { align: 8, .. }), "{err}");
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_clone_hands_the_block_back() {
    let frees = Arc::new(AtomicUsize::new(0));
    let original = Fragile {
        frees: Arc::clone(&frees),
    };
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _handle: Result<AllocatorHandle<caps![]>, _> = wrap_copied(&original);
    }));
    assert!(outcome.is_err());
    assert_eq!(frees.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Degradation defaults
// ============================================================================

#[test]
fn omitted_operations_degrade_to_fixed_defaults() {
    let handle: AllocatorHandle<caps![]> = wrap(Leaky { _state: 7 }).unwrap();

    let mut span = handle.allocate(10, None);
    assert!(!span.is_null());
    unsafe {
        assert!(!handle.deallocate(span));
        assert!(!handle.expand(&mut span, 20));
        assert!(!handle.reallocate(&mut span, 20));
        assert!(!handle.aligned_reallocate(&mut span, 20, 8));
        assert!(!handle.deallocate_all());
    }
    assert!(handle.aligned_allocate(8, 8).is_null());
    assert!(handle.allocate_all().is_null());
    assert_eq!(handle.owns(span), Ternary::Unknown);
    let mut out = ByteSpan::NULL;
    assert_eq!(handle.resolve_internal_pointer(span.as_ptr(), &mut out), Ternary::Unknown);
    assert!(out.is_null());
    assert_eq!(handle.empty(), Ternary::Unknown);
    assert_eq!(handle.alignment(), PLATFORM_ALIGNMENT);
    assert_eq!(handle.good_alloc_size(1), PLATFORM_ALIGNMENT);
    assert_eq!(handle.good_alloc_size(usize::MAX), usize::MAX);

    // Without `deallocate` the adapter block cannot be returned.
    assert!(!handle.dispose());
}

// ============================================================================
// Threading
// ============================================================================

fn is_send_sync<T: Send + Sync>() {}

#[test]
fn shared_instance_handles_cross_threads() {
    is_send_sync::<AllocatorHandle<caps![SharedInstance]>>();
    is_send_sync::<AllocatorHandle<caps![SharedInstance, NoFailureTracking]>>();

    let handle: Arc<AllocatorHandle<caps![SharedInstance]>> = Arc::new(wrap(GlobalHeap).unwrap());
    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                let span = handle.allocate(32 + i, None);
                assert!(!span.is_null());
                unsafe { handle.deallocate(span) }
            })
        })
        .collect();
    for worker in workers {
        assert!(worker.join().unwrap());
    }
}

#[test]
fn other_handles_stay_on_their_thread() {
    assert!(Detect::<AllocatorHandle<caps![SharedInstance]>>::IS_SHARED_INSTANCE);
    assert!(!<Detect<AllocatorHandle<caps![]>> as SharedInstanceFallback>::IS_SHARED_INSTANCE);
    assert!(!Detect::<AllocatorHandle<caps![NoFailureTracking, SharedMemory]>>::IS_SHARED_INSTANCE);
}
