use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tokio_stream::StreamExt;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/inventory", get(inventory_report))
        .route("/valuation", get(supplier_valuation))
}

/// Stream the full movement ledger as newline-delimited JSON, one report
/// row per line, produced incrementally as the client reads.
pub async fn inventory_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let lines = services.reports.inventory_report().map(|result| {
        let row = result?;
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');
        Ok::<Bytes, axum::BoxError>(Bytes::from(line))
    });

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}

pub async fn supplier_valuation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    match services.reports.supplier_valuation().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
