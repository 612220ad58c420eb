//! Handler-side authorization guard.
//!
//! Authentication happens in the middleware; the admin capability check
//! stays next to the handlers that need it, so read routes remain open to
//! any authenticated user while management routes are gated explicitly.

use axum::http::StatusCode;
use axum::response::Response;

use crate::app::errors;
use crate::context::CurrentUser;

/// Admin capability check for management routes.
pub fn require_admin(user: &CurrentUser) -> Result<(), Response> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "operation restricted to administrators",
        ))
    }
}
