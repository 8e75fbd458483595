//! Compile-time compatibility rules and their runtime mirror.
//!
//! Rejections at construction time live in the `compile_fail` doctests of
//! `allocator_caps::compat`; here `compatible!` observes the same decisions.

use std::sync::Mutex;

use allocator_caps::prelude::*;
use allocator_caps::{check, check_erased, compatible, inspect, Incompatibility, Inspection, Operations, SpanKind};
use proptest::prelude::*;

// ============================================================================
// Allocators
// ============================================================================

/// Collector-style allocator: shareable, but its operations may unwind.
#[derive(Default)]
struct Collected {
    live: Mutex<usize>,
}

#[allocator]
unsafe impl Collected {
    fn allocate(&self, size: usize, _tag: Option<TypeTag>) -> ByteSpan {
        let span = GlobalHeap.allocate(size, None);
        *self.live.lock().unwrap() += 1;
        span
    }

    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        *self.live.lock().unwrap() -= 1;
        unsafe { GlobalHeap.deallocate(span) }
    }
}

/// Untracked `allocate`, tracked `expand`.
struct Partial;

#[allocator]
unsafe impl Partial {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }

    unsafe fn expand(&self, _span: &mut ByteSpan, _new_size: usize) -> bool {
        false
    }
}

struct SharedArena;

#[allocator]
unsafe impl SharedArena {
    #[untracked]
    fn allocate(&self, size: usize) -> SharedSpan {
        let span = GlobalHeap.allocate(size, None);
        SharedSpan::new(span.as_ptr(), span.len())
    }
}

struct ThreadBound {
    _marker: std::marker::PhantomData<*const ()>,
}

#[allocator]
unsafe impl ThreadBound {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }
}

// ============================================================================
// Compile-time rules
// ============================================================================

#[test]
fn scenario_a_untracked_shareable_exclusive_allocator() {
    assert!(compatible!(GlobalHeap, caps![]));
    assert!(compatible!(GlobalHeap, caps![NoFailureTracking]));
    assert!(compatible!(GlobalHeap, caps![SharedInstance]));
    assert!(compatible!(GlobalHeap, caps![NoFailureTracking, SharedInstance]));
    assert!(!compatible!(GlobalHeap, caps![SharedMemory]));

    let plain: AllocatorHandle<caps![]> = wrap(GlobalHeap).unwrap();
    let untracked: AllocatorHandle<caps![NoFailureTracking]> = wrap(GlobalHeap).unwrap();
    let shared: AllocatorHandle<caps![SharedInstance]> = wrap(GlobalHeap).unwrap();

    let span = plain.allocate(1, None);
    assert!(!span.is_null() && span.len() >= 1);
    assert!(unsafe { plain.deallocate(span) });

    let span = untracked.allocate(1, None);
    assert!(!span.is_null() && span.len() >= 1);
    assert!(unsafe { untracked.deallocate(span) });

    let span = shared.allocate(1, None);
    assert!(!span.is_null() && span.len() >= 1);
    assert!(unsafe { shared.deallocate(span) });
}

#[test]
fn scenario_b_collector_backed_allocator() {
    assert!(!compatible!(Collected, caps![NoFailureTracking]));
    assert!(compatible!(Collected, caps![]));
    assert!(compatible!(Collected, caps![SharedInstance]));

    let handle: AllocatorHandle<caps![]> = wrap(Collected::default()).unwrap();
    let span = handle.allocate(16, None);
    assert!(span.len() >= 16);
    assert!(unsafe { handle.deallocate(span) });
}

#[test]
fn failure_tracking_is_all_or_nothing() {
    assert!(!compatible!(Partial, caps![NoFailureTracking]));
    assert!(!compatible!(Partial, caps![NoFailureTracking, SharedInstance]));
    assert!(compatible!(Partial, caps![]));
}

#[test]
fn shared_memory_must_match_exactly() {
    assert!(compatible!(SharedArena, caps![SharedMemory]));
    assert!(compatible!(SharedArena, caps![SharedMemory, NoFailureTracking, SharedInstance]));
    assert!(!compatible!(SharedArena, caps![]));
    assert!(!compatible!(SharedArena, caps![SharedInstance]));
}

#[test]
fn shared_instance_requires_send_and_sync() {
    assert!(!compatible!(ThreadBound, caps![SharedInstance]));
    assert!(compatible!(ThreadBound, caps![]));
    assert!(compatible!(ThreadBound, caps![NoFailureTracking]));
}

#[test]
fn handles_only_serve_their_own_set() {
    assert!(compatible!(AllocatorHandle<caps![SharedInstance]>, caps![SharedInstance]));
    assert!(!compatible!(AllocatorHandle<caps![SharedInstance]>, caps![]));
    assert!(!compatible!(AllocatorHandle<caps![]>, caps![SharedInstance]));
    assert!(!compatible!(AllocatorHandle<caps![NoFailureTracking]>, caps![]));
}

// ============================================================================
// Runtime mirror
// ============================================================================

#[test]
fn check_agrees_with_compatible_for_concrete_types() {
    type Plain = caps![];
    type Untracked = caps![NoFailureTracking];
    type Concurrent = caps![SharedInstance];
    type SharedMem = caps![SharedMemory];

    macro_rules! agree {
        ($ty:ty, $($set:ty),+) => {$(
            assert_eq!(
                check(&inspect!($ty), <$set as Capabilities>::SET).is_ok(),
                compatible!($ty, $set),
                "{} for {}",
                stringify!($ty),
                <$set as Capabilities>::SET,
            );
        )+};
    }

    agree!(GlobalHeap, Plain, Untracked, Concurrent, SharedMem);
    agree!(Collected, Plain, Untracked, Concurrent, SharedMem);
    agree!(Partial, Plain, Untracked, Concurrent, SharedMem);
    agree!(SharedArena, Plain, Untracked, Concurrent, SharedMem);
    agree!(ThreadBound, Plain, Untracked, Concurrent, SharedMem);
}

#[test]
fn check_names_the_failing_rule() {
    assert_eq!(
        check(&inspect!(GlobalHeap), CapabilitySet::SHARED_MEMORY),
        Err(Incompatibility::SpanMismatch {
            requested: SpanKind::Shared,
            provided: SpanKind::Exclusive,
        })
    );
    assert_eq!(
        check(&inspect!(Partial), CapabilitySet::NO_FAILURE_TRACKING),
        Err(Incompatibility::FailureTracked {
            operations: Operations::EXPAND,
        })
    );
    assert_eq!(
        check(&inspect!(ThreadBound), CapabilitySet::SHARED_INSTANCE),
        Err(Incompatibility::NotShareable)
    );
    assert_eq!(
        check_erased(CapabilitySet::SHARED_INSTANCE, CapabilitySet::empty()),
        Err(Incompatibility::ErasedMismatch {
            requested: CapabilitySet::empty(),
            provided: CapabilitySet::SHARED_INSTANCE,
        })
    );
    assert!(check_erased(CapabilitySet::all(), CapabilitySet::all()).is_ok());
}

#[test]
fn incompatibility_messages_are_readable() {
    let err = check(&inspect!(Partial), CapabilitySet::NO_FAILURE_TRACKING).unwrap_err();
    assert_eq!(
        err.to_string(),
        "operations [expand] are not exempt from runtime failure tracking"
    );
}

// ============================================================================
// Properties
// ============================================================================

fn any_set() -> impl Strategy<Value = CapabilitySet> {
    (0u8..8).prop_map(CapabilitySet::from_bits_retain)
}

fn any_inspection() -> impl Strategy<Value = Inspection> {
    (1u16..(1 << 13), any::<u16>(), any::<bool>(), any::<bool>()).prop_map(|(declared, untracked, shared, shareable)| {
        let declared = Operations::from_bits_truncate(declared) | Operations::ALLOCATE;
        let span = if shared { SpanKind::Shared } else { SpanKind::Exclusive };
        Inspection::new(declared, Operations::from_bits_truncate(untracked), span, shareable)
    })
}

proptest! {
    /// Serving a set always allows serving every weaker set that keeps the
    /// same span kind.
    #[test]
    fn weaker_requests_are_served(inspection in any_inspection(), strong in any_set(), weak in any_set()) {
        let weak = weak.intersection(strong) | (strong & CapabilitySet::SHARED_MEMORY);
        if check(&inspection, strong).is_ok() {
            prop_assert!(check(&inspection, weak).is_ok());
        }
    }

    /// Stronger requests are only served when the measured capabilities
    /// cover them.
    #[test]
    fn no_implicit_upgrade(inspection in any_inspection(), requested in any_set()) {
        let measured = inspection.capabilities();
        let outcome = check(&inspection, requested);
        let covered = measured.all_set(requested - CapabilitySet::SHARED_MEMORY)
            && measured.shared_memory() == requested.shared_memory();
        prop_assert_eq!(outcome.is_ok(), covered);
    }
}
