//! Privilege rules for account administration.
//!
//! The single SUPERADMIN is the bootstrap identity: its role is frozen and it
//! cannot be deleted, whoever asks.

use thiserror::Error;

use super::Role;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct Denied(pub &'static str);

/// The subject or object of an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }
}

pub const fn require_role(actor: Principal, minimum: Role) -> Result<(), Denied> {
    if (actor.role as u8) < (minimum as u8) {
        return Err(Denied("insufficient privileges"));
    }
    Ok(())
}

/// Whether `actor` may edit `target`'s record at all.
pub fn can_administer(actor: Principal, target: Principal) -> Result<(), Denied> {
    require_role(actor, Role::Admin)?;

    if target.role == Role::SuperAdmin && actor.id != target.id {
        return Err(Denied("only the superadmin may modify the superadmin account"));
    }

    if target.role > actor.role {
        return Err(Denied("cannot modify an account with higher privileges"));
    }

    Ok(())
}

pub fn can_assign_role(actor: Principal, target: Principal, role: Role) -> Result<(), Denied> {
    if role == target.role {
        return Ok(());
    }

    if target.role == Role::SuperAdmin {
        return Err(Denied("the superadmin role cannot be changed"));
    }

    if role == Role::SuperAdmin {
        return Err(Denied("the superadmin role cannot be granted"));
    }

    if role > actor.role {
        return Err(Denied("cannot grant a role above your own"));
    }

    Ok(())
}

pub fn can_create(actor: Principal, role: Role) -> Result<(), Denied> {
    require_role(actor, Role::Admin)?;

    if role == Role::SuperAdmin {
        return Err(Denied("the superadmin role cannot be granted"));
    }

    if role > actor.role {
        return Err(Denied("cannot grant a role above your own"));
    }

    Ok(())
}

pub fn can_delete(actor: Principal, target: Principal) -> Result<(), Denied> {
    if target.role == Role::SuperAdmin {
        return Err(Denied("the superadmin account cannot be deleted"));
    }

    if actor.id == target.id {
        return Err(Denied("cannot delete your own account"));
    }

    can_administer(actor, target)
}
