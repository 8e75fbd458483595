//! Autoref-based trait detection machinery.
//!
//! This module implements the "Inherent Const Fallback" pattern for
//! compile-time trait detection on concrete types.
//!
//! ## How it works
//!
//! For each fact we want to detect:
//! 1. Define a fallback trait with `const IS_FACT: bool = false`
//! 2. Implement fallback for `Detect<X>` for all X
//! 3. Implement an inherent const `IS_FACT = true` for `Detect<X>` where
//!    `X` meets the bounds
//!
//! When resolving `Detect::<Concrete>::IS_FACT`, the compiler:
//! - If `Concrete` meets the bounds, finds the inherent const (true)
//! - Otherwise, finds the trait const (false)
//!
//! ## Limitation
//!
//! This only works for **concrete types** known at the call site.
//! It does NOT work in generic contexts like `fn foo<T>()`.

use core::marker::PhantomData;

use crate::caps::Capabilities;
use crate::compat::Wrap;

/// Detection wrapper type.
#[doc(hidden)]
pub struct Detect<T: ?Sized>(PhantomData<T>);

/// Generate fallback trait + inherent const for one marker-trait fact.
macro_rules! impl_detect {
    ($($Fact:ident => $($bound:ident),+;)*) => {
        $(
            ::paste::paste! {
                #[doc(hidden)]
                pub trait [<$Fact Fallback>] { const [<IS_ $Fact:snake:upper>]: bool = false; }
                impl<T: ?Sized> [<$Fact Fallback>] for Detect<T> {}
                impl<T: ?Sized $(+ $bound)+> Detect<T> { pub const [<IS_ $Fact:snake:upper>]: bool = true; }
            }
        )*
    };
}

impl_detect! {
    SharedInstance => Send, Sync;
}

// Compatibility is a two-parameter question, so it is asked of the pair.

#[doc(hidden)]
pub trait CompatibleFallback {
    const IS_COMPATIBLE: bool = false;
}

impl<T: ?Sized> CompatibleFallback for Detect<T> {}

impl<A: Wrap<C>, C: Capabilities> Detect<(A, C)> {
    pub const IS_COMPATIBLE: bool = true;
}
