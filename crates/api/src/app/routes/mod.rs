use axum::Router;

pub mod locations;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/suppliers", suppliers::router())
        .nest("/locations", locations::router())
        .nest("/products", products::router())
        .nest("/reports", reports::router())
        .nest("/users", users::router())
}
