//! Tri-state answers.

use core::fmt;

/// Answer to a query the allocator may be unable to settle.
///
/// `Unknown` means the allocator cannot answer. It is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ternary {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Ternary {
    /// `Some(bool)` for a definite answer.
    pub const fn known(self) -> Option<bool> {
        match self {
            Ternary::Yes => Some(true),
            Ternary::No => Some(false),
            Ternary::Unknown => None,
        }
    }

    /// `true` for a definite yes.
    pub const fn is_yes(self) -> bool {
        matches!(self, Ternary::Yes)
    }

    /// `true` for a definite no.
    pub const fn is_no(self) -> bool {
        matches!(self, Ternary::No)
    }

    /// `true` when the allocator could not answer.
    pub const fn is_unknown(self) -> bool {
        matches!(self, Ternary::Unknown)
    }
}

impl From<bool> for Ternary {
    fn from(value: bool) -> Self {
        if value { Ternary::Yes } else { Ternary::No }
    }
}

impl From<Option<bool>> for Ternary {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(b) => b.into(),
            None => Ternary::Unknown,
        }
    }
}

impl fmt::Display for Ternary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ternary::Yes => f.write_str("yes"),
            Ternary::No => f.write_str("no"),
            Ternary::Unknown => f.write_str("unknown"),
        }
    }
}
