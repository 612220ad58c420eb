//! Integration tests for the warehouse stores.
//!
//! These tests require Docker to be running and will spin up a PostgreSQL
//! container using testcontainers.

use rust_decimal::Decimal;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio_stream::StreamExt;

use stockroom_auth::{NewUser, User, UserUpdate};
use stockroom_catalog::{NewLocation, NewProduct, NewSupplier, Product, ProductUpdate};
use stockroom_core::{DomainError, ProductId, SupplierId, UserId};
use stockroom_inventory::{Direction, Movement};
use stockroom_store::{
    schema, CatalogStore, InventoryEngine, MovementLedger, ReportGenerator, ReportRow, StoreError,
    UserStore,
};

/// Test helper to set up a PostgreSQL container and connection pool.
struct TestDb {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestDb {
    async fn new() -> Self {
        let container = Postgres::default().start().await.unwrap();
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();

        let connection_string = format!("postgres://postgres:postgres@{host}:{port}/postgres");
        let pool = PgPool::connect(&connection_string).await.unwrap();

        Self {
            _container: container,
            pool,
        }
    }

    /// Fresh database with the schema applied.
    async fn migrated() -> Self {
        let db = Self::new().await;
        schema::migrate(&db.pool).await.unwrap();
        db
    }
}

async fn seed_user(pool: &PgPool, login: &str) -> User {
    UserStore::new(pool.clone())
        .create_user(&NewUser::new(login, "a-long-password", false).unwrap())
        .await
        .unwrap()
}

async fn seed_product(pool: &PgPool, sku: &str, price: &str, quantity: i32) -> Product {
    let new = NewProduct::new(
        format!("Product {sku}"),
        sku,
        price.parse().unwrap(),
        quantity,
        None,
        None,
    )
    .unwrap();
    CatalogStore::new(pool.clone())
        .create_product(&new)
        .await
        .unwrap()
}

fn movement(direction: Direction, amount: i32) -> Movement {
    Movement::new(direction, amount).unwrap()
}

async fn ledger_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM warehouse_logs")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn stock_of(pool: &PgPool, id: ProductId) -> i32 {
    CatalogStore::new(pool.clone())
        .get_product(id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity()
}

async fn collect_report(pool: &PgPool) -> Vec<ReportRow> {
    let mut stream = ReportGenerator::new(pool.clone()).inventory_report();
    let mut rows = Vec::new();
    while let Some(row) = stream.next().await {
        rows.push(row.unwrap());
    }
    rows
}

#[tokio::test]
async fn migrate_is_idempotent() {
    let db = TestDb::new().await;

    schema::migrate(&db.pool).await.unwrap();
    schema::migrate(&db.pool).await.unwrap();

    let suppliers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suppliers")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(suppliers, 0);
    assert_eq!(ledger_rows(&db.pool).await, 0);
}

#[tokio::test]
async fn supplier_crud_roundtrip() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    let created = store
        .create_supplier(&NewSupplier::new("Acme", Some("sales@acme.test".into())).unwrap())
        .await
        .unwrap();
    assert_eq!(created.name(), "Acme");
    assert_eq!(created.contact_email(), Some("sales@acme.test"));

    let fetched = store.get_supplier(created.id()).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));

    let all = store.list_suppliers().await.unwrap();
    assert_eq!(all, vec![created.clone()]);

    store.delete_supplier(created.id()).await.unwrap();
    assert_eq!(store.get_supplier(created.id()).await.unwrap(), None);

    let err = store.delete_supplier(created.id()).await.unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "supplier"),
        other => panic!("Expected NotFound for deleted supplier, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_supplier_name_conflicts() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    store
        .create_supplier(&NewSupplier::new("Acme", None).unwrap())
        .await
        .unwrap();

    let err = store
        .create_supplier(&NewSupplier::new("Acme", None).unwrap())
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::Conflict(_)) => {}
        other => panic!("Expected Conflict for duplicate supplier name, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_location_pair_conflicts() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    store
        .create_location(&NewLocation::new("A", 1).unwrap())
        .await
        .unwrap();

    // Same zone, different shelf is a different slot.
    store
        .create_location(&NewLocation::new("A", 2).unwrap())
        .await
        .unwrap();

    let err = store
        .create_location(&NewLocation::new("A", 1).unwrap())
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::Conflict(_)) => {}
        other => panic!("Expected Conflict for duplicate location, got {other:?}"),
    }

    let all = store.list_locations().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn create_product_checks_references() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    let orphan = NewProduct::new(
        "Widget",
        "SKU-1",
        Decimal::ZERO,
        0,
        Some(SupplierId::new(999)),
        None,
    )
    .unwrap();
    let err = store.create_product(&orphan).await.unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "supplier"),
        other => panic!("Expected NotFound for unknown supplier, got {other:?}"),
    }

    let supplier = store
        .create_supplier(&NewSupplier::new("Acme", None).unwrap())
        .await
        .unwrap();
    let location = store
        .create_location(&NewLocation::new("A", 1).unwrap())
        .await
        .unwrap();

    let linked = NewProduct::new(
        "Widget",
        "SKU-1",
        "9.99".parse().unwrap(),
        5,
        Some(supplier.id()),
        Some(location.id()),
    )
    .unwrap();
    let product = store.create_product(&linked).await.unwrap();
    assert_eq!(product.supplier_id(), Some(supplier.id()));
    assert_eq!(product.location_id(), Some(location.id()));

    let by_sku = store.get_product_by_sku("SKU-1").await.unwrap();
    assert_eq!(by_sku, Some(product));
    assert_eq!(store.get_product_by_sku("SKU-404").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_sku_conflicts() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    seed_product(&db.pool, "SKU-1", "1.00", 0).await;

    let dup = NewProduct::new("Other", "SKU-1", Decimal::ZERO, 0, None, None).unwrap();
    let err = store.create_product(&dup).await.unwrap_err();
    match err {
        StoreError::Domain(DomainError::Conflict(_)) => {}
        other => panic!("Expected Conflict for duplicate SKU, got {other:?}"),
    }
}

#[tokio::test]
async fn product_update_keeps_unset_fields() {
    let db = TestDb::migrated().await;
    let store = CatalogStore::new(db.pool.clone());

    let product = seed_product(&db.pool, "SKU-1", "9.99", 5).await;

    let update = ProductUpdate::new(None, Some("12.50".parse().unwrap()), None, None).unwrap();
    let updated = store.update_product(product.id(), &update).await.unwrap();

    assert_eq!(updated.price(), "12.50".parse().unwrap());
    assert_eq!(updated.name(), product.name());
    assert_eq!(updated.sku(), product.sku());
    assert_eq!(updated.stock_quantity(), 5);

    let update = ProductUpdate::new(None, None, Some(SupplierId::new(999)), None).unwrap();
    let err = store.update_product(product.id(), &update).await.unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "supplier"),
        other => panic!("Expected NotFound for unknown supplier, got {other:?}"),
    }

    let err = store
        .update_product(ProductId::new(999), &ProductUpdate::default())
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "product"),
        other => panic!("Expected NotFound for unknown product, got {other:?}"),
    }
}

#[tokio::test]
async fn adjust_stock_in_then_out() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let product = seed_product(&db.pool, "SKU-1", "9.99", 0).await;

    let adjusted = engine
        .adjust_stock(product.id(), user.id(), movement(Direction::In, 5))
        .await
        .unwrap();
    assert_eq!(adjusted.product.stock_quantity(), 5);
    assert_eq!(adjusted.entry.quantity_change(), 5);
    assert_eq!(adjusted.entry.action(), Direction::In);

    let adjusted = engine
        .adjust_stock(product.id(), user.id(), movement(Direction::Out, 3))
        .await
        .unwrap();
    assert_eq!(adjusted.product.stock_quantity(), 2);
    assert_eq!(adjusted.entry.quantity_change(), -3);
    assert_eq!(adjusted.entry.action(), Direction::Out);
    assert_eq!(adjusted.entry.user_id(), user.id());
    assert_eq!(adjusted.entry.product_id(), product.id());

    assert_eq!(stock_of(&db.pool, product.id()).await, 2);
    assert_eq!(ledger_rows(&db.pool).await, 2);

    // The signed changes sum to the stock on hand.
    let net: i64 = sqlx::query_scalar("SELECT SUM(quantity_change) FROM warehouse_logs")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(net, 2);
}

#[tokio::test]
async fn adjust_stock_insufficient_leaves_no_trace() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let product = seed_product(&db.pool, "SKU-1", "9.99", 2).await;

    let err = engine
        .adjust_stock(product.id(), user.id(), movement(Direction::Out, 5))
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::InsufficientStock {
            requested,
            available,
        }) => {
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("Expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(stock_of(&db.pool, product.id()).await, 2);
    assert_eq!(ledger_rows(&db.pool).await, 0);
}

#[tokio::test]
async fn concurrent_out_movements_serialize() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let product = seed_product(&db.pool, "SKU-1", "9.99", 10).await;

    let first = engine.adjust_stock(product.id(), user.id(), movement(Direction::Out, 6));
    let second = engine.adjust_stock(product.id(), user.id(), movement(Direction::Out, 6));
    let (first, second) = tokio::join!(first, second);

    // Exactly one wins; the loser sees the post-commit quantity.
    let (ok, err) = match (first, second) {
        (Ok(ok), Err(err)) => (ok, err),
        (Err(err), Ok(ok)) => (ok, err),
        other => panic!("Expected exactly one success, got {other:?}"),
    };
    assert_eq!(ok.product.stock_quantity(), 4);
    match err {
        StoreError::Domain(DomainError::InsufficientStock {
            requested,
            available,
        }) => {
            assert_eq!(requested, 6);
            assert_eq!(available, 4);
        }
        other => panic!("Expected InsufficientStock for the loser, got {other:?}"),
    }

    assert_eq!(stock_of(&db.pool, product.id()).await, 4);
    assert_eq!(ledger_rows(&db.pool).await, 1);
}

#[tokio::test]
async fn adjust_stock_with_unknown_user_rolls_back() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let product = seed_product(&db.pool, "SKU-1", "9.99", 7).await;

    let err = engine
        .adjust_stock(product.id(), UserId::new(9999), movement(Direction::Out, 3))
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "user"),
        other => panic!("Expected NotFound for unknown user, got {other:?}"),
    }

    // The quantity write happened inside the transaction; it must be gone.
    assert_eq!(stock_of(&db.pool, product.id()).await, 7);
    assert_eq!(ledger_rows(&db.pool).await, 0);
}

#[tokio::test]
async fn adjust_stock_unknown_product_not_found() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;

    let err = engine
        .adjust_stock(ProductId::new(999), user.id(), movement(Direction::In, 1))
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::NotFound(entity)) => assert_eq!(entity, "product"),
        other => panic!("Expected NotFound for unknown product, got {other:?}"),
    }
}

#[tokio::test]
async fn deleting_product_cascades_its_ledger() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());
    let catalog = CatalogStore::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let kept = seed_product(&db.pool, "SKU-1", "9.99", 0).await;
    let doomed = seed_product(&db.pool, "SKU-2", "1.00", 0).await;

    engine
        .adjust_stock(kept.id(), user.id(), movement(Direction::In, 1))
        .await
        .unwrap();
    engine
        .adjust_stock(doomed.id(), user.id(), movement(Direction::In, 2))
        .await
        .unwrap();
    assert_eq!(ledger_rows(&db.pool).await, 2);

    catalog.delete_product(doomed.id()).await.unwrap();

    // Only the deleted product's history goes with it.
    assert_eq!(ledger_rows(&db.pool).await, 1);
    let report = collect_report(&db.pool).await;
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].product, kept.name());
}

#[tokio::test]
async fn deleting_user_with_history_conflicts() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());
    let users = UserStore::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let product = seed_product(&db.pool, "SKU-1", "9.99", 0).await;
    engine
        .adjust_stock(product.id(), user.id(), movement(Direction::In, 1))
        .await
        .unwrap();

    let err = users.delete_user(user.id()).await.unwrap_err();
    match err {
        StoreError::Domain(DomainError::Conflict(_)) => {}
        other => panic!("Expected Conflict for user with ledger entries, got {other:?}"),
    }

    // Removing the product clears the history and unblocks the delete.
    CatalogStore::new(db.pool.clone())
        .delete_product(product.id())
        .await
        .unwrap();
    users.delete_user(user.id()).await.unwrap();
    assert_eq!(users.get_user(user.id()).await.unwrap(), None);
}

#[tokio::test]
async fn inventory_report_projects_in_order() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let alice = seed_user(&db.pool, "alice").await;
    let bob = seed_user(&db.pool, "bob").await;
    let widget = seed_product(&db.pool, "SKU-1", "9.99", 0).await;
    let gadget = seed_product(&db.pool, "SKU-2", "1.00", 0).await;

    engine
        .adjust_stock(widget.id(), alice.id(), movement(Direction::In, 5))
        .await
        .unwrap();
    engine
        .adjust_stock(gadget.id(), bob.id(), movement(Direction::In, 2))
        .await
        .unwrap();
    engine
        .adjust_stock(widget.id(), bob.id(), movement(Direction::Out, 1))
        .await
        .unwrap();

    let report = collect_report(&db.pool).await;
    let seen: Vec<(&str, &str, i32, Direction)> = report
        .iter()
        .map(|row| {
            (
                row.user.as_str(),
                row.product.as_str(),
                row.quantity_change,
                row.action_type,
            )
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("alice", widget.name(), 5, Direction::In),
            ("bob", gadget.name(), 2, Direction::In),
            ("bob", widget.name(), -1, Direction::Out),
        ]
    );
    assert!(report.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    // Consuming the report is a read; a second pass sees the same rows.
    assert_eq!(collect_report(&db.pool).await, report);
}

#[tokio::test]
async fn ledger_stream_walks_large_history_in_order() {
    let db = TestDb::migrated().await;
    let engine = InventoryEngine::new(db.pool.clone());

    let user = seed_user(&db.pool, "alice").await;
    let product = seed_product(&db.pool, "SKU-1", "9.99", 0).await;

    for _ in 0..300 {
        engine
            .adjust_stock(product.id(), user.id(), movement(Direction::In, 1))
            .await
            .unwrap();
    }

    let mut stream = MovementLedger::new(db.pool.clone()).stream_all();
    let mut count = 0;
    let mut last_id = 0;
    while let Some(record) = stream.next().await {
        let record = record.unwrap();
        assert!(record.entry.id().as_i64() > last_id);
        last_id = record.entry.id().as_i64();
        count += 1;
    }
    assert_eq!(count, 300);
    assert_eq!(stock_of(&db.pool, product.id()).await, 300);
}

#[tokio::test]
async fn supplier_valuation_excludes_zero_stock() {
    let db = TestDb::migrated().await;
    let catalog = CatalogStore::new(db.pool.clone());
    let reports = ReportGenerator::new(db.pool.clone());

    let acme = catalog
        .create_supplier(&NewSupplier::new("Acme", None).unwrap())
        .await
        .unwrap();
    let globex = catalog
        .create_supplier(&NewSupplier::new("Globex", None).unwrap())
        .await
        .unwrap();
    let initech = catalog
        .create_supplier(&NewSupplier::new("Initech", None).unwrap())
        .await
        .unwrap();
    catalog
        .create_supplier(&NewSupplier::new("NoStock Co", None).unwrap())
        .await
        .unwrap();

    let seed = |name: &str, sku: &str, price: &str, qty: i32, supplier: SupplierId| {
        NewProduct::new(name, sku, price.parse().unwrap(), qty, Some(supplier), None).unwrap()
    };
    catalog
        .create_product(&seed("Widget", "SKU-1", "10.00", 2, acme.id()))
        .await
        .unwrap();
    // Zero stock, but its supplier still qualifies through the widget.
    catalog
        .create_product(&seed("Spare", "SKU-2", "5.00", 0, acme.id()))
        .await
        .unwrap();
    catalog
        .create_product(&seed("Gizmo", "SKU-3", "30.00", 1, initech.id()))
        .await
        .unwrap();
    // Globex holds nothing in stock.
    catalog
        .create_product(&seed("Ghost", "SKU-4", "99.00", 0, globex.id()))
        .await
        .unwrap();

    let valuation = reports.supplier_valuation().await.unwrap();

    let seen: Vec<(&str, i64, i64, Decimal)> = valuation
        .iter()
        .map(|row| {
            (
                row.supplier_name.as_str(),
                row.unique_products,
                row.total_units,
                row.total_valuation,
            )
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("Initech", 1, 1, "30.00".parse().unwrap()),
            ("Acme", 2, 2, "20.00".parse().unwrap()),
        ]
    );
}

#[tokio::test]
async fn user_crud_and_credentials() {
    let db = TestDb::migrated().await;
    let users = UserStore::new(db.pool.clone());

    let alice = users
        .create_user(&NewUser::new("alice", "first-password", false).unwrap())
        .await
        .unwrap();
    assert!(!alice.is_admin());

    let err = users
        .create_user(&NewUser::new("alice", "other-password", false).unwrap())
        .await
        .unwrap_err();
    match err {
        StoreError::Domain(DomainError::Conflict(_)) => {}
        other => panic!("Expected Conflict for duplicate login, got {other:?}"),
    }

    // Hashes, not passwords, are what's stored.
    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE login = 'alice'")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert!(!stored.contains("first-password"));

    let verified = users
        .verify_credentials("alice", "first-password")
        .await
        .unwrap();
    assert_eq!(verified, Some(alice.clone()));

    // Unknown login and wrong password are indistinguishable.
    assert_eq!(
        users.verify_credentials("alice", "wrong-password").await.unwrap(),
        None
    );
    assert_eq!(
        users.verify_credentials("nobody", "first-password").await.unwrap(),
        None
    );

    let update = UserUpdate::new(None, Some("second-password".into()), Some(true)).unwrap();
    let updated = users.update_user(alice.id(), &update).await.unwrap();
    assert!(updated.is_admin());
    assert_eq!(updated.login(), "alice");

    assert_eq!(
        users.verify_credentials("alice", "first-password").await.unwrap(),
        None
    );
    assert!(users
        .verify_credentials("alice", "second-password")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let db = TestDb::migrated().await;
    let users = UserStore::new(db.pool.clone());

    assert!(users.ensure_admin("admin", "admin-password").await.unwrap());
    assert!(!users.ensure_admin("admin", "admin-password").await.unwrap());

    let admin = users
        .verify_credentials("admin", "admin-password")
        .await
        .unwrap();
    let Some(admin) = admin else {
        panic!("Expected seeded admin to verify");
    };
    assert!(admin.is_admin());

    // A second seeding run never overwrites the password.
    assert!(!users.ensure_admin("admin", "changed-password").await.unwrap());
    assert!(users
        .verify_credentials("admin", "admin-password")
        .await
        .unwrap()
        .is_some());
}
