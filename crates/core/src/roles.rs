//! Opaque actor identity and ownership/role checks.
//!
//! Credential validation lives outside this system; every mutating
//! operation receives an already-authenticated `(actor id, role)` pair and
//! this module only decides what that pair may touch.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::UserId;

/// Roles the identity provider can assert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    ParkingOwner,
    Admin,
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "parking-owner" => Ok(Role::ParkingOwner),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::Unauthorized(format!("Unknown role '{other}'"))),
        }
    }
}

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A lot may be mutated by its owner or an admin, nobody else.
pub fn authorize_lot_manager(actor: &Actor, owner: UserId) -> Result<(), CoreError> {
    if actor.id == owner || actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not authorized to manage this parking lot".to_string(),
        ))
    }
}

/// A review may be mutated by its author or an admin, nobody else.
pub fn authorize_review_author(actor: &Actor, author: UserId) -> Result<(), CoreError> {
    if actor.id == author || actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not authorized to manage this review".to_string(),
        ))
    }
}
