use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use stockroom_store::UserStore;

use crate::app::errors;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub users: UserStore,
}

/// HTTP Basic authentication for every protected route.
///
/// A missing header, a malformed header, an unknown login, and a wrong
/// password all produce the same 401 response, so a probe cannot tell
/// which part of the credentials was wrong.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let Some((login, password)) = extract_basic(req.headers()) else {
        return Err(unauthorized());
    };

    let verified = state
        .users
        .verify_credentials(&login, &password)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "credential check failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        })?;

    let Some(user) = verified else {
        return Err(unauthorized());
    };

    req.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(req).await)
}

fn extract_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?.trim();

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;

    Some((login.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    let mut response = errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "incorrect login or password",
    );
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
    response
}
