//! # Layer 0: Primitives
//!
//! Basic building blocks shared by every other layer:
//! - `bool.rs`: Type-level boolean logic (Present/Absent).
//! - `span.rs`: Byte spans, exclusive and shared.
//! - `ternary.rs`: Yes/No/Unknown answers.
//! - `tag.rs`: Diagnostic type tags passed to `allocate`.

pub mod bool;
pub mod span;
pub mod ternary;
pub mod tag;

// Re-export key types at this level
pub use bool::{Absent, Bool, Implies, Present};
pub use span::{ByteSpan, SharedSpan, Span, SpanKind};
pub use tag::TypeTag;
pub use ternary::Ternary;
