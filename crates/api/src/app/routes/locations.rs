use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_catalog::NewLocation;
use stockroom_core::LocationId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/:id", get(get_location).delete(delete_location))
}

pub async fn create_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::CreateLocationRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let location = match NewLocation::new(body.zone_name, body.shelf_number) {
        Ok(location) => location,
        Err(err) => return errors::domain_error_to_response(err),
    };

    match services.catalog.create_location(&location).await {
        Ok(created) => {
            (StatusCode::CREATED, Json(dto::location_to_json(&created))).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn list_locations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.list_locations().await {
        Ok(locations) => {
            let items = locations
                .iter()
                .map(dto::location_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: LocationId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid location id")
        }
    };

    match services.catalog.get_location(id).await {
        Ok(Some(location)) => {
            (StatusCode::OK, Json(dto::location_to_json(&location))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "location not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn delete_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require_admin(&user) {
        return resp;
    }

    let id: LocationId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid location id")
        }
    };

    match services.catalog.delete_location(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
