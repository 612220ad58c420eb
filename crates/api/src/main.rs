#[tokio::main]
async fn main() {
    stockroom_observability::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let admin_login = std::env::var("STOCKROOM_ADMIN_LOGIN").unwrap_or_else(|_| {
        tracing::warn!("STOCKROOM_ADMIN_LOGIN not set; using dev default");
        "admin".to_string()
    });
    let admin_password = std::env::var("STOCKROOM_ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("STOCKROOM_ADMIN_PASSWORD not set; using insecure dev default");
        "admin-dev-password".to_string()
    });

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("failed to connect to database");

    stockroom_store::schema::migrate(&pool)
        .await
        .expect("failed to apply database schema");

    let seeded = stockroom_store::UserStore::new(pool.clone())
        .ensure_admin(&admin_login, &admin_password)
        .await
        .expect("failed to seed administrator account");
    if seeded {
        tracing::info!(login = %admin_login, "seeded administrator account");
    }

    let app = stockroom_api::app::build_app(pool);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
