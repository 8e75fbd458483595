//! Type-level capability sets.
//!
//! `Caps<NT, SM, SI>` carries one type-level boolean per flag. Only the eight
//! instantiations over `Present`/`Absent` implement [`Capabilities`]; each one
//! pins down the generated interface for that set:
//!
//! ```text
//! NT SM SI | Span        Interface
//! ---------+---------------------------------------------------------
//!  .  .  . | ByteSpan    dyn AllocatorInterface<Self>
//!  x  .  . | ByteSpan    dyn AllocatorInterface<Self>
//!  .  x  . | SharedSpan  dyn AllocatorInterface<Self>
//!  x  x  . | SharedSpan  dyn AllocatorInterface<Self>
//!  .  .  x | ByteSpan    dyn AllocatorInterface<Self> + Send + Sync
//!  x  .  x | ByteSpan    dyn AllocatorInterface<Self> + Send + Sync
//!  .  x  x | SharedSpan  dyn AllocatorInterface<Self> + Send + Sync
//!  x  x  x | SharedSpan  dyn AllocatorInterface<Self> + Send + Sync
//! ```
//!
//! Everything here depends on the set alone, never on an implementation.

use core::fmt;
use core::marker::PhantomData;

use crate::interface::{AllocatorInterface, InterfaceDescriptor};
use crate::primitives::{Absent, Bool, ByteSpan, Present, SharedSpan, Span};

use super::set::CapabilitySet;

mod sealed {
    pub trait Sealed {}
}

/// Type-level capability set.
///
/// Build one with `caps![...]` rather than spelling the parameters out.
pub struct Caps<NT = Absent, SM = Absent, SI = Absent>(PhantomData<fn() -> (NT, SM, SI)>);

impl<NT, SM, SI> Caps<NT, SM, SI> {
    pub const fn new() -> Self {
        Caps(PhantomData)
    }
}

impl<NT, SM, SI> Default for Caps<NT, SM, SI> {
    fn default() -> Self {
        Self::new()
    }
}

impl<NT, SM, SI> Clone for Caps<NT, SM, SI> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<NT, SM, SI> Copy for Caps<NT, SM, SI> {}

impl<NT: Bool, SM: Bool, SI: Bool> fmt::Debug for Caps<NT, SM, SI> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Caps{}", CapabilitySet::from_flags(NT::VALUE, SM::VALUE, SI::VALUE))
    }
}

/// A capability set known at compile time.
///
/// Sealed: exactly the eight `Caps` variants implement it.
pub trait Capabilities: sealed::Sealed + Sized + 'static {
    type NoFailureTracking: Bool;
    type SharedMemory: Bool;
    type SharedInstance: Bool;

    /// Span type every operation of the generated interface uses.
    type Span: Span;

    /// The generated interface as a trait object type.
    type Interface: ?Sized + AllocatorInterface<Self> + 'static;

    /// Runtime mirror of this set.
    const SET: CapabilitySet = CapabilitySet::from_flags(
        <Self::NoFailureTracking as Bool>::VALUE,
        <Self::SharedMemory as Bool>::VALUE,
        <Self::SharedInstance as Bool>::VALUE,
    );

    /// Operation surface generated for this set.
    const DESCRIPTOR: InterfaceDescriptor = InterfaceDescriptor::generate(Self::SET);
}

macro_rules! capability_variants {
    ($([$nt:ident, $sm:ident, $si:ident] => $span:ty, $iface:ty;)*) => {
        $(
            impl sealed::Sealed for Caps<$nt, $sm, $si> {}

            impl Capabilities for Caps<$nt, $sm, $si> {
                type NoFailureTracking = $nt;
                type SharedMemory = $sm;
                type SharedInstance = $si;
                type Span = $span;
                type Interface = $iface;
            }
        )*
    };
}

capability_variants! {
    [Absent, Absent, Absent] => ByteSpan, dyn AllocatorInterface<Self>;
    [Present, Absent, Absent] => ByteSpan, dyn AllocatorInterface<Self>;
    [Absent, Present, Absent] => SharedSpan, dyn AllocatorInterface<Self>;
    [Present, Present, Absent] => SharedSpan, dyn AllocatorInterface<Self>;
    [Absent, Absent, Present] => ByteSpan, dyn AllocatorInterface<Self> + Send + Sync;
    [Present, Absent, Present] => ByteSpan, dyn AllocatorInterface<Self> + Send + Sync;
    [Absent, Present, Present] => SharedSpan, dyn AllocatorInterface<Self> + Send + Sync;
    [Present, Present, Present] => SharedSpan, dyn AllocatorInterface<Self> + Send + Sync;
}
