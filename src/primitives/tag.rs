//! Diagnostic type tags.

use core::any::type_name;
use core::fmt;

/// Opaque tag naming the type an allocation is meant for.
///
/// Purely diagnostic: allocators may record it, nothing may depend on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    name: &'static str,
}

impl TypeTag {
    /// Tag carrying `T`'s type name.
    pub fn of<T: ?Sized>() -> Self {
        Self { name: type_name::<T>() }
    }

    /// Tag with a caller-chosen name.
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name this tag was created with.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeTag").field(&self.name).finish()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
