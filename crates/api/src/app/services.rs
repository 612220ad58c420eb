//! Store wiring shared by all handlers.

use sqlx::PgPool;

use stockroom_store::{CatalogStore, InventoryEngine, ReportGenerator, UserStore};

/// Shared application services, one instance behind an `Arc`.
///
/// Every store holds a clone of the same pool; cloning the pool is cheap
/// handle duplication, not a new connection.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogStore,
    pub engine: InventoryEngine,
    pub reports: ReportGenerator,
    pub users: UserStore,
}

impl AppServices {
    pub fn new(pool: PgPool) -> Self {
        Self {
            catalog: CatalogStore::new(pool.clone()),
            engine: InventoryEngine::new(pool.clone()),
            reports: ReportGenerator::new(pool.clone()),
            users: UserStore::new(pool),
        }
    }
}
