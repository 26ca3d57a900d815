use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// Account role carried on every identity record and in every token
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Seller,
    User,
}

impl Role {
    const fn bit(self) -> u8 {
        match self {
            Role::SuperAdmin => 1,
            Role::Admin => 1 << 1,
            Role::Seller => 1 << 2,
            Role::User => 1 << 3,
        }
    }

    pub fn is_staff(self) -> bool {
        RoleSet::STAFF.contains(self)
    }
}

/// Allow-list of roles for a route.
///
/// ```
/// use core_accounts::{Role, RoleSet};
///
/// let staff = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);
/// assert!(staff.contains(Role::SuperAdmin));
/// assert!(!staff.contains(Role::User));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const NONE: RoleSet = RoleSet(0);
    pub const SUPER_ADMIN: RoleSet = RoleSet::of(&[Role::SuperAdmin]);
    pub const STAFF: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);
    pub const SELLER: RoleSet = RoleSet::of(&[Role::Seller]);
    pub const STAFF_OR_USER: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin, Role::User]);
    pub const ANY: RoleSet =
        RoleSet::of(&[Role::Admin, Role::SuperAdmin, Role::User, Role::Seller]);

    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn union(self, other: RoleSet) -> Self {
        RoleSet(self.0 | other.0)
    }

    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::iter().filter(move |r| self.contains(*r))
    }
}
