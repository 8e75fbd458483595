//! Set operations on type-level capability sets: With, SetUnion, SupersetOf
//!
//! These traits combine and compare `Caps` values at the type level. The
//! runtime counterparts are `CapabilitySet::union` and `CapabilitySet::all_set`.

use crate::primitives::{Bool, Implies, Present};

use super::markers::{NoFailureTracking, SharedInstance, SharedMemory};
use super::variants::Caps;

/// Insert one capability into a set.
pub trait With<Cap> {
    type Out;
}

impl<NT, SM, SI> With<NoFailureTracking> for Caps<NT, SM, SI> {
    type Out = Caps<Present, SM, SI>;
}

impl<NT, SM, SI> With<SharedMemory> for Caps<NT, SM, SI> {
    type Out = Caps<NT, Present, SI>;
}

impl<NT, SM, SI> With<SharedInstance> for Caps<NT, SM, SI> {
    type Out = Caps<NT, SM, Present>;
}

/// Set Union: Merge two capability sets.
pub trait SetUnion<Other> {
    type Out;
}

impl<NT, SM, SI, NT2, SM2, SI2> SetUnion<Caps<NT2, SM2, SI2>> for Caps<NT, SM, SI>
where
    NT: Bool,
    SM: Bool,
    SI: Bool,
    NT2: Bool,
    SM2: Bool,
    SI2: Bool,
{
    type Out = Caps<NT::Or<NT2>, SM::Or<SM2>, SI::Or<SI2>>;
}

/// SupersetOf: Check if Self contains all capabilities in Other.
pub trait SupersetOf<Other> {}

impl<NT, SM, SI, NT2, SM2, SI2> SupersetOf<Caps<NT2, SM2, SI2>> for Caps<NT, SM, SI>
where
    NT: Implies<NT2>,
    SM: Implies<SM2>,
    SI: Implies<SI2>,
    NT2: Bool,
    SM2: Bool,
    SI2: Bool,
{
}

/// Macro to add capabilities to a set
/// Usage:
/// - `with![Set, Cap]` -> Single add
/// - `with![Set, A, B]` -> Chain add (A then B)
#[macro_export]
macro_rules! with {
    ($set:ty, $cap:ty) => {
        <$set as $crate::caps::With<$cap>>::Out
    };
    ($set:ty, $cap:ty, $($rest:ty),+) => {
        $crate::with![ $crate::with![$set, $cap], $($rest),+ ]
    };
}

/// Macro to compute union of two capability sets
/// Usage: `union![SetA, SetB]`
#[macro_export]
macro_rules! union {
    ($a:ty, $b:ty) => {
        <$a as $crate::caps::SetUnion<$b>>::Out
    };
}
