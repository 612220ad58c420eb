use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockroom_catalog::{NewProduct, ProductUpdate};
use stockroom_core::{LocationId, ProductId, SupplierId};
use stockroom_inventory::Movement;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/:id/adjust", post(adjust_stock))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let product = match NewProduct::new(
        body.name,
        body.sku,
        body.price,
        body.stock_quantity,
        body.supplier_id.map(SupplierId::new),
        body.location_id.map(LocationId::new),
    ) {
        Ok(product) => product,
        Err(err) => return errors::domain_error_to_response(err),
    };

    match services.catalog.create_product(&product).await {
        Ok(created) => (StatusCode::CREATED, Json(dto::product_to_json(&created))).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_products().await {
        Ok(products) => {
            let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.catalog.get_product(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let update = match ProductUpdate::new(
        body.name,
        body.price,
        body.supplier_id.map(SupplierId::new),
        body.location_id.map(LocationId::new),
    ) {
        Ok(update) => update,
        Err(err) => return errors::domain_error_to_response(err),
    };

    match services.catalog.update_product(id, &update).await {
        Ok(updated) => (StatusCode::OK, Json(dto::product_to_json(&updated))).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.catalog.delete_product(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

/// Move stock in or out. Open to any authenticated user; the ledger entry
/// is attributed to the caller.
pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    let movement = match Movement::new(body.direction, body.amount) {
        Ok(movement) => movement,
        Err(err) => return errors::domain_error_to_response(err),
    };

    match services.engine.adjust_stock(id, user.id(), movement).await {
        Ok(adjusted) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product": dto::product_to_json(&adjusted.product),
                "entry": dto::entry_to_json(&adjusted.entry),
            })),
        )
            .into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
