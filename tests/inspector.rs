//! Structural inspection of concrete allocators.

use std::cell::Cell;

use allocator_caps::prelude::*;
use allocator_caps::{inspect, Inspection, Operations, SpanKind};

// ============================================================================
// Allocators under inspection
// ============================================================================

/// Every operation it has is untracked.
struct Quiet;

#[allocator]
unsafe impl Quiet {
    #[untracked]
    fn allocate(&self, size: usize, _tag: Option<TypeTag>) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }

    #[untracked]
    unsafe fn deallocate(&self, span: ByteSpan) -> bool {
        unsafe { GlobalHeap.deallocate(span) }
    }

    #[untracked]
    fn owns(&self, _span: ByteSpan) -> Ternary {
        Ternary::Unknown
    }
}

/// `allocate` is untracked, `expand` is not.
struct HalfQuiet;

#[allocator]
unsafe impl HalfQuiet {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        GlobalHeap.allocate(size, None)
    }

    unsafe fn expand(&self, _span: &mut ByteSpan, _new_size: usize) -> bool {
        false
    }

    /// Not an operation, so never inspected.
    fn describe(&self) -> &'static str {
        "half quiet"
    }
}

/// Hands out shared-memory spans.
struct Shared;

#[allocator]
unsafe impl Shared {
    #[untracked]
    fn allocate(&self, size: usize) -> SharedSpan {
        let span = GlobalHeap.allocate(size, None);
        SharedSpan::new(span.as_ptr(), span.len())
    }
}

/// Thread-confined state.
struct Local {
    calls: Cell<usize>,
}

#[allocator]
unsafe impl Local {
    #[untracked]
    fn allocate(&self, size: usize) -> ByteSpan {
        self.calls.set(self.calls.get() + 1);
        GlobalHeap.allocate(size, None)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn present_operations_are_recorded() {
    let report = inspect!(Quiet);
    assert_eq!(
        report.declared(),
        Operations::ALLOCATE | Operations::DEALLOCATE | Operations::OWNS
    );
    assert_eq!(report.untracked(), report.declared());
    assert!(report.tracked().is_empty());
}

#[test]
fn fully_untracked_allocator_qualifies() {
    assert!(inspect!(Quiet).no_failure_tracking());
    assert!(inspect!(GlobalHeap).no_failure_tracking());
}

#[test]
fn one_tracked_operation_disqualifies_the_allocator() {
    let report = inspect!(HalfQuiet);
    assert!(report.untracked().contains(Operations::ALLOCATE));
    assert_eq!(report.tracked(), Operations::EXPAND);
    assert!(!report.no_failure_tracking());
    assert_eq!(HalfQuiet.describe(), "half quiet");
}

#[test]
fn span_type_decides_shared_memory() {
    assert_eq!(inspect!(Shared).span(), SpanKind::Shared);
    assert!(inspect!(Shared).shared_memory());
    assert!(!inspect!(Quiet).shared_memory());
}

#[test]
fn send_sync_decides_shared_instance() {
    assert!(inspect!(Quiet).shared_instance());
    assert!(!inspect!(Local).shared_instance());
}

#[test]
fn capabilities_combine_all_three_facts() {
    assert_eq!(
        inspect!(GlobalHeap).capabilities(),
        CapabilitySet::NO_FAILURE_TRACKING | CapabilitySet::SHARED_INSTANCE
    );
    assert_eq!(
        inspect!(Shared).capabilities(),
        CapabilitySet::NO_FAILURE_TRACKING | CapabilitySet::SHARED_MEMORY | CapabilitySet::SHARED_INSTANCE
    );
    assert_eq!(inspect!(HalfQuiet).capabilities(), CapabilitySet::SHARED_INSTANCE);
    assert_eq!(inspect!(Local).capabilities(), CapabilitySet::NO_FAILURE_TRACKING);
}

#[test]
fn generic_inspection_takes_shareability_from_the_caller() {
    fn report<A: Allocator>() -> Inspection {
        Inspection::of::<A>(false)
    }
    assert_eq!(report::<Quiet>().declared(), inspect!(Quiet).declared());
    assert!(!report::<Quiet>().shared_instance());
}

#[test]
fn untracked_operations_outside_the_declared_set_are_ignored() {
    let report = Inspection::new(Operations::ALLOCATE, Operations::all(), SpanKind::Exclusive, false);
    assert_eq!(report.untracked(), Operations::ALLOCATE);
    assert!(report.no_failure_tracking());
}

#[test]
fn report_display_names_tracked_operations() {
    let text = inspect!(HalfQuiet).to_string();
    assert!(text.starts_with("{SharedInstance}"), "{text}");
    assert!(text.contains("tracked [expand]"), "{text}");
}

#[test]
fn allocator_metadata_matches_the_impl_block() {
    assert_eq!(<GlobalHeap as Allocator>::OPERATIONS.operations().count(), 7);
    assert!(!<GlobalHeap as Allocator>::OPERATIONS.contains(Operations::EXPAND));
    assert_eq!(<HalfQuiet as Allocator>::UNTRACKED, Operations::ALLOCATE);
}
