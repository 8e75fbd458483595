//! Procedural macros for the allocator-caps capability system
//!
//! | Macro | Target | Purpose |
//! |-------|--------|---------|
//! | `#[allocator]` | inherent impl | Inspect an allocator and implement `Allocator` |
//! | `caps![]` | - | Build capability set type |
//!
//! ## Example
//!
//! ```ignore
//! struct Bump { /* ... */ }
//!
//! #[allocator]
//! impl Bump {
//!     #[untracked]
//!     fn allocate(&self, size: usize) -> ByteSpan { /* ... */ }
//!
//!     #[untracked]
//!     fn owns(&self, span: ByteSpan) -> Ternary { /* ... */ }
//! }
//!
//! let handle: AllocatorHandle<caps![NoFailureTracking]> = wrap(Bump::new())?;
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemImpl};

// =============================================================================
// Module Declarations (Two-tier: common / user)
// =============================================================================

mod common;
mod user;

/// Derive `Allocator` from an inherent impl block.
///
/// Methods named after an allocator operation (`allocate`, `deallocate`,
/// `aligned_allocate`, `allocate_all`, `expand`, `reallocate`,
/// `aligned_reallocate`, `deallocate_all`, `alignment`, `good_alloc_size`,
/// `owns`, `resolve_internal_pointer`, `empty`) are picked up; all take
/// `&self`. `allocate` is required, may omit the trailing type tag, and its
/// return type fixes the span type. Operations that invalidate spans must be
/// `unsafe fn`.
///
/// Mark an operation `#[untracked]` when it never unwinds and needs no
/// runtime failure-tracking facility. The allocator only qualifies for
/// `NoFailureTracking` when every operation it implements is marked.
///
/// The generated impl is `unsafe impl Allocator`: applying the attribute
/// asserts that the allocating operations return live, writable memory.
#[proc_macro_attribute]
pub fn allocator(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemImpl);
    match user::expand_allocator(attr.into(), item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Build a capability set type from flag markers.
///
/// Flags may appear in any order; duplicates are rejected. The bare names
/// `NoFailureTracking`, `SharedMemory` and `SharedInstance` resolve without
/// an import.
///
/// # Example
/// ```ignore
/// type Shared = caps![SharedInstance, NoFailureTracking];
///
/// // Empty set
/// type Plain = caps![];
/// ```
#[proc_macro]
pub fn caps(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as user::CapsInput);
    let types: Vec<_> = input.types.into_iter().collect();

    if let Err(err) = user::check_duplicates(&types) {
        return err.to_compile_error().into();
    }

    user::build_capset(&types).into()
}
