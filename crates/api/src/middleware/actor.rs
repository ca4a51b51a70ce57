//! Acting-identity extraction.
//!
//! Credential validation is an external collaborator: by the time a request
//! reaches this service, a gateway has authenticated it and asserted the
//! identity as a `(actor id, role)` header pair. This extractor only parses
//! that pair; it never validates credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use spotwatch_core::error::CoreError;
use spotwatch_core::roles::{Actor, Role};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user id (UUID).
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the asserted role (`user`, `parking-owner`, `admin`).
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Extractor for the acting identity on protected routes.
///
/// Missing or malformed identity headers reject with 401 before the
/// handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, ACTOR_ID_HEADER)?;
        let id: Uuid = id.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "{ACTOR_ID_HEADER} must be a UUID"
            )))
        })?;

        let role = header_value(parts, ACTOR_ROLE_HEADER)?;
        let role: Role = role.parse().map_err(AppError::Core)?;

        Ok(AuthActor(Actor::new(id, role)))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Missing identity header {name}"
            )))
        })
}
