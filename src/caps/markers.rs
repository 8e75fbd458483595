//! Capability markers.
//!
//! Each marker is a zero-sized type naming one flag of [`CapabilitySet`].
//! They are the vocabulary of `caps![...]`.

use super::set::CapabilitySet;

/// Capability Trait
///
/// Implemented by the unit structs representing individual flags.
pub trait Capability: 'static {
    /// Runtime flag this marker stands for.
    const FLAG: CapabilitySet;
    /// Display name.
    const NAME: &'static str;
}

macro_rules! define_capabilities {
    ($($(#[$meta:meta])* $name:ident => $flag:ident;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl Capability for $name {
                const FLAG: CapabilitySet = CapabilitySet::$flag;
                const NAME: &'static str = stringify!($name);
            }
        )*
    };
}

define_capabilities! {
    /// Marker: operations never depend on a runtime failure-tracking facility.
    NoFailureTracking => NO_FAILURE_TRACKING;
    /// Marker: spans are usable concurrently as shared memory.
    SharedMemory => SHARED_MEMORY;
    /// Marker: the allocator object is safe to call from several threads at once.
    SharedInstance => SHARED_INSTANCE;
}
