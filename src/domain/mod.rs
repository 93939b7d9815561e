//! Domain primitives shared by the storage and service layers.
//!
//! Account roles, the version counter arithmetic used for optimistic
//! concurrency, and the privilege rules in [`authz`].

pub mod authz;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::versioning::VERSION_CEILING;

/// Account privilege level. Variant order is privilege order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "SUPERADMIN")]
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPERADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an account row is being rewritten.
///
/// Only direct mutations revoke the account's session tokens. The caller
/// states the kind explicitly; it is never inferred from the changed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Credentials, role, username or the forced-password flag changed.
    Direct,
    /// An association row referencing the account was created or destroyed.
    RelationshipOnly,
}

impl MutationKind {
    #[must_use]
    pub const fn revokes_sessions(self) -> bool {
        matches!(self, Self::Direct)
    }
}

/// Version that follows `current` after an accepted update.
///
/// Reference form of the `CASE` expression the account repository writes in SQL.
#[must_use]
pub const fn next_version(current: i32) -> i32 {
    if current < VERSION_CEILING {
        current + 1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_increments() {
        assert_eq!(next_version(0), 1);
        assert_eq!(next_version(3), 4);
        assert_eq!(next_version(VERSION_CEILING - 1), VERSION_CEILING);
    }

    #[test]
    fn test_next_version_wraps_at_ceiling() {
        assert_eq!(next_version(VERSION_CEILING), 0);
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::User < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
        assert_eq!(Role::SuperAdmin.to_string(), "SUPERADMIN");
    }

    #[test]
    fn test_role_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"SUPERADMIN\"");
    }

    #[test]
    fn test_only_direct_mutations_revoke_sessions() {
        assert!(MutationKind::Direct.revokes_sessions());
        assert!(!MutationKind::RelationshipOnly.revokes_sessions());
    }
}
