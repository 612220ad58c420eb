use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_catalog::NewSupplier;
use stockroom_core::SupplierId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", get(get_supplier).delete(delete_supplier))
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateSupplierRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let supplier = match NewSupplier::new(body.name, body.contact_email) {
        Ok(supplier) => supplier,
        Err(err) => return errors::domain_error_to_response(err),
    };

    match services.catalog.create_supplier(&supplier).await {
        Ok(created) => {
            (StatusCode::CREATED, Json(dto::supplier_to_json(&created))).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_suppliers().await {
        Ok(suppliers) => {
            let items = suppliers
                .iter()
                .map(dto::supplier_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SupplierId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid supplier id")
        }
    };

    match services.catalog.get_supplier(id).await {
        Ok(Some(supplier)) => {
            (StatusCode::OK, Json(dto::supplier_to_json(&supplier))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "supplier not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn delete_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let id: SupplierId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid supplier id")
        }
    };

    match services.catalog.delete_supplier(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
