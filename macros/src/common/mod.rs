// Common utilities shared between the user-facing macros
//
// This module contains:
// - operations: The allocator operation table
// - parse_utils: Common parsing helpers

mod operations;
mod parse_utils;

pub use operations::*;
pub use parse_utils::*;
