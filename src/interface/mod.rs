//! # Layer 2: Interface Generator
//!
//! Derives the operation surface of an allocator interface from a capability
//! set. The same thirteen operations exist for every set; what the set
//! decides is the span type they traffic in, whether every operation is
//! exempt from runtime failure tracking, and whether every operation may be
//! called concurrently on a shared instance.
//!
//! ```text
//! CapabilitySet --generate--> InterfaceDescriptor --signatures--> [Signature; 13]
//!      |                                                    (runtime description)
//!      v
//! Caps<NT, SM, SI>::Interface = dyn AllocatorInterface<Caps<..>> [+ Send + Sync]
//!                                                          (what callers invoke)
//! ```

pub mod descriptor;
pub mod operation;
pub mod surface;

pub use descriptor::{InterfaceDescriptor, Signature};
pub use operation::{Fallback, Operation, Operations, PLATFORM_ALIGNMENT, ReturnKind};
pub use surface::AllocatorInterface;
