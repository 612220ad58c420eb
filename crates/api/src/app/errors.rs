use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_store::StoreError;

/// Map a store failure onto the HTTP error taxonomy.
///
/// Business failures keep their message; storage faults are logged here
/// and the response body stays generic.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_failed", msg)
        }
        StoreError::Domain(err @ DomainError::NotFound(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        StoreError::Domain(DomainError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        StoreError::Domain(err @ DomainError::InsufficientStock { .. }) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            err.to_string(),
        ),
        StoreError::Storage(err) => {
            tracing::error!(error = %err, "storage fault");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

/// Map a rejected input onto the same taxonomy. Used where DTOs are turned
/// into validated domain values before any store call.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    store_error_to_response(StoreError::Domain(err))
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
