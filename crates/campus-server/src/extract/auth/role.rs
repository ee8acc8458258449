//! Closed set of account roles and role allow-lists.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Role held by an account.
///
/// The set is closed: any other string fails to parse, both from JSON and
/// from [`str::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Campus administrator.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Returns the capitalized role name used in greetings.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Teacher => "Teacher",
            Self::Student => "Student",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Allow-list of roles permitted on a route.
///
/// An empty set admits nobody.
#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Creates an empty set.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates a set containing every role.
    pub fn all() -> Self {
        Role::iter().collect()
    }

    /// Creates a set from a slice of roles.
    pub const fn of(roles: &[Role]) -> Self {
        let mut set = Self::empty();
        let mut i = 0;
        while i < roles.len() {
            set = set.with(roles[i]);
            i += 1;
        }
        set
    }

    /// Returns a copy of this set that also admits `role`.
    #[inline]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    /// Returns whether `role` is admitted.
    #[must_use]
    #[inline]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Returns whether the set admits nobody.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the admitted roles in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::iter().filter(move |role| self.contains(*role))
    }
}

impl From<Role> for RoleSet {
    #[inline]
    fn from(role: Role) -> Self {
        Self::empty().with(role)
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    #[inline]
    fn from(roles: [Role; N]) -> Self {
        Self::of(&roles)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for role in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(role.as_ref())?;
            first = false;
        }
        Ok(())
    }
}
