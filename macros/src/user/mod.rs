//! User-facing macro implementations
//!
//! | Macro | Usage | Purpose |
//! |-------|-------|---------|
//! | `#[allocator]` | on inherent impl | Derive the `Allocator` impl |
//! | `caps!` | function macro | Build capability set |

mod allocator;
mod cap_set;

pub use allocator::expand_allocator;
pub use cap_set::{build_capset, check_duplicates, CapsInput};
