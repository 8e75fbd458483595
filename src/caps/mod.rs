//! # Layer 1: Capability Sets
//!
//! The closed vocabulary of guarantees an allocator consumer may require,
//! in two mirrored forms:
//!
//! - `set.rs`: the runtime value [`CapabilitySet`], a bit set over three flags.
//! - `markers.rs`: one marker type per flag ([`NoFailureTracking`],
//!   [`SharedMemory`], [`SharedInstance`]).
//! - `variants.rs`: the type-level set [`Caps`] and its eight instantiations,
//!   each fixing the span type and erased interface for that set.
//! - `ops.rs`: type-level set algebra (`With`, `SetUnion`, `SupersetOf`).
//!
//! Adding a flag means touching all four files plus the checker rows in
//! `compat.rs`; the three must always move together.

pub mod markers;
pub mod ops;
pub mod set;
pub mod variants;

pub use markers::{Capability, NoFailureTracking, SharedInstance, SharedMemory};
pub use ops::{SetUnion, SupersetOf, With};
pub use set::CapabilitySet;
pub use variants::{Capabilities, Caps};
