//! Type-level boolean logic.
//!
//! Core types: `Present` (true), `Absent` (false), `Bool` trait.
//!
//! Capability sets are triples of these booleans, so every rule of the
//! compatibility checker reduces to one of the relations below.

/// Type-level boolean.
pub trait Bool: 'static {
    const VALUE: bool;

    /// Logical OR
    type Or<Other: Bool>: Bool;
}

/// Type-level True.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Present;

/// Type-level False.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Absent;

impl Bool for Present {
    const VALUE: bool = true;
    type Or<Other: Bool> = Present;
}

impl Bool for Absent {
    const VALUE: bool = false;
    type Or<Other: Bool> = Other;
}

/// Type-level implication: `Self => Required`.
///
/// Implemented for every pair except `Absent => Present`. A guarantee that is
/// held may always serve a request that does not ask for it, never the
/// reverse.
pub trait Implies<Required: Bool>: Bool {}

impl Implies<Present> for Present {}
impl Implies<Absent> for Present {}
impl Implies<Absent> for Absent {}
