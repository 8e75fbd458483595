//! The thirteen allocator operations.

use core::fmt;

use bitflags::bitflags;

/// Alignment of the platform's most strictly aligned scalar type.
///
/// Default answer of `alignment()` for allocators that do not report one.
pub const PLATFORM_ALIGNMENT: usize = core::mem::align_of::<u128>();

bitflags! {
    /// A set of operations, one bit per [`Operation`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Operations: u16 {
        const ALLOCATE = 1 << 0;
        const DEALLOCATE = 1 << 1;
        const ALIGNED_ALLOCATE = 1 << 2;
        const ALLOCATE_ALL = 1 << 3;
        const EXPAND = 1 << 4;
        const REALLOCATE = 1 << 5;
        const ALIGNED_REALLOCATE = 1 << 6;
        const DEALLOCATE_ALL = 1 << 7;
        const ALIGNMENT = 1 << 8;
        const GOOD_ALLOC_SIZE = 1 << 9;
        const OWNS = 1 << 10;
        const RESOLVE_INTERNAL_POINTER = 1 << 11;
        const EMPTY = 1 << 12;
    }
}

/// One allocator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Allocate,
    Deallocate,
    AlignedAllocate,
    AllocateAll,
    Expand,
    Reallocate,
    AlignedReallocate,
    DeallocateAll,
    Alignment,
    GoodAllocSize,
    Owns,
    ResolveInternalPointer,
    Empty,
}

/// What the generated interface returns when the wrapped allocator omits an
/// operation. Fixed per operation; never decided per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// The operation is mandatory; there is nothing to fall back to.
    Required,
    /// Returns `false`.
    False,
    /// Returns the null span.
    NullSpan,
    /// Returns `Ternary::Unknown`.
    Unknown,
    /// Returns [`PLATFORM_ALIGNMENT`].
    PlatformAlignment,
    /// Returns the size rounded up to a multiple of `alignment()`.
    RoundUpToAlignment,
}

/// Shape of an operation's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    Span,
    Bool,
    Usize,
    Ternary,
}

/// Shape of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ParamKind {
    Usize,
    Tag,
    Span,
    SpanMut,
    Address,
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 13] = [
        Operation::Allocate,
        Operation::Deallocate,
        Operation::AlignedAllocate,
        Operation::AllocateAll,
        Operation::Expand,
        Operation::Reallocate,
        Operation::AlignedReallocate,
        Operation::DeallocateAll,
        Operation::Alignment,
        Operation::GoodAllocSize,
        Operation::Owns,
        Operation::ResolveInternalPointer,
        Operation::Empty,
    ];

    /// Method name on `Allocator` and `AllocatorInterface`.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Allocate => "allocate",
            Operation::Deallocate => "deallocate",
            Operation::AlignedAllocate => "aligned_allocate",
            Operation::AllocateAll => "allocate_all",
            Operation::Expand => "expand",
            Operation::Reallocate => "reallocate",
            Operation::AlignedReallocate => "aligned_reallocate",
            Operation::DeallocateAll => "deallocate_all",
            Operation::Alignment => "alignment",
            Operation::GoodAllocSize => "good_alloc_size",
            Operation::Owns => "owns",
            Operation::ResolveInternalPointer => "resolve_internal_pointer",
            Operation::Empty => "empty",
        }
    }

    /// Looks an operation up by method name.
    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }

    /// The bit for this operation.
    pub const fn flag(self) -> Operations {
        Operations::from_bits_retain(1 << self as u16)
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Operation::Allocate)
    }

    /// Operations that invalidate or resize spans are `unsafe fn`.
    pub const fn is_unsafe(self) -> bool {
        matches!(
            self,
            Operation::Deallocate
                | Operation::Expand
                | Operation::Reallocate
                | Operation::AlignedReallocate
                | Operation::DeallocateAll
        )
    }

    pub const fn fallback(self) -> Fallback {
        match self {
            Operation::Allocate => Fallback::Required,
            Operation::Deallocate
            | Operation::Expand
            | Operation::Reallocate
            | Operation::AlignedReallocate
            | Operation::DeallocateAll => Fallback::False,
            Operation::AlignedAllocate | Operation::AllocateAll => Fallback::NullSpan,
            Operation::Owns | Operation::ResolveInternalPointer | Operation::Empty => Fallback::Unknown,
            Operation::Alignment => Fallback::PlatformAlignment,
            Operation::GoodAllocSize => Fallback::RoundUpToAlignment,
        }
    }

    pub const fn returns(self) -> ReturnKind {
        match self {
            Operation::Allocate | Operation::AlignedAllocate | Operation::AllocateAll => ReturnKind::Span,
            Operation::Deallocate
            | Operation::Expand
            | Operation::Reallocate
            | Operation::AlignedReallocate
            | Operation::DeallocateAll => ReturnKind::Bool,
            Operation::Alignment | Operation::GoodAllocSize => ReturnKind::Usize,
            Operation::Owns | Operation::ResolveInternalPointer | Operation::Empty => ReturnKind::Ternary,
        }
    }

    pub(crate) const fn params(self) -> &'static [(&'static str, ParamKind)] {
        match self {
            Operation::Allocate => &[("size", ParamKind::Usize), ("tag", ParamKind::Tag)],
            Operation::Deallocate | Operation::Owns => &[("span", ParamKind::Span)],
            Operation::AlignedAllocate => &[("size", ParamKind::Usize), ("alignment", ParamKind::Usize)],
            Operation::AllocateAll | Operation::DeallocateAll | Operation::Alignment | Operation::Empty => &[],
            Operation::Expand | Operation::Reallocate => {
                &[("span", ParamKind::SpanMut), ("new_size", ParamKind::Usize)]
            }
            Operation::AlignedReallocate => &[
                ("span", ParamKind::SpanMut),
                ("new_size", ParamKind::Usize),
                ("alignment", ParamKind::Usize),
            ],
            Operation::GoodAllocSize => &[("size", ParamKind::Usize)],
            Operation::ResolveInternalPointer => &[("ptr", ParamKind::Address), ("out", ParamKind::SpanMut)],
        }
    }
}

impl Operations {
    /// Iterates the operations in this set, in declaration order.
    pub fn operations(self) -> impl Iterator<Item = Operation> {
        Operation::ALL.into_iter().filter(move |op| self.contains(op.flag()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Required => f.write_str("required"),
            Fallback::False => f.write_str("false"),
            Fallback::NullSpan => f.write_str("null span"),
            Fallback::Unknown => f.write_str("unknown"),
            Fallback::PlatformAlignment => f.write_str("platform alignment"),
            Fallback::RoundUpToAlignment => f.write_str("size rounded up to alignment"),
        }
    }
}

impl fmt::Display for Operations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, op) in self.operations().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(op.name())?;
        }
        f.write_str("]")
    }
}
