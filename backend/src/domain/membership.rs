//! Favourite and shopping-cart membership sets.

use std::fmt;

/// Which per-user recipe set an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    Favorite,
    Cart,
}

impl MembershipKind {
    /// Human-readable set name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Cart => "shopping cart",
        }
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
