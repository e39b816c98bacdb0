//! API-side authorization guard.
//!
//! Handlers call [`require`] before touching a service, keeping the domain
//! crates auth-agnostic.

use axum::http::StatusCode;
use axum::response::Response;

use partstock_auth::{authorize, permissions_from_roles, AuthzError, Permission, Principal};

use crate::app::errors;
use crate::context::PrincipalContext;

pub fn check(principal: &PrincipalContext, required: &Permission) -> Result<(), AuthzError> {
    let principal = Principal {
        user_id: principal.user_id(),
        username: principal.username().to_string(),
        roles: principal.roles().to_vec(),
        permissions: permissions_from_roles(principal.roles()),
    };
    authorize(&principal, required)
}

/// Like [`check`], but already mapped to a 403 response.
pub fn require(principal: &PrincipalContext, required: Permission) -> Result<(), Response> {
    check(principal, &required).map_err(|e| {
        tracing::info!(username = principal.username(), permission = %required, "forbidden");
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
