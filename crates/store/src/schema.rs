//! Database schema provisioning.

use sqlx::PgPool;

use crate::error::StoreResult;

/// Apply the warehouse schema (idempotent).
///
/// This uses `CREATE TABLE IF NOT EXISTS` style DDL so it can be run on
/// startup. Constraints are named explicitly because the error mapping in
/// the stores keys off constraint names.
#[tracing::instrument(skip(pool))]
pub async fn migrate(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS suppliers (
            id            BIGSERIAL PRIMARY KEY,
            name          VARCHAR(100) NOT NULL,
            contact_email TEXT NULL,
            CONSTRAINT suppliers_name_key UNIQUE (name)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS locations (
            id           BIGSERIAL PRIMARY KEY,
            zone_name    VARCHAR(10) NOT NULL,
            shelf_number INTEGER NOT NULL,
            CONSTRAINT locations_zone_shelf_key UNIQUE (zone_name, shelf_number)
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            login         VARCHAR(50) NOT NULL,
            password_hash TEXT NOT NULL,
            is_admin      BOOLEAN NOT NULL DEFAULT FALSE,
            CONSTRAINT users_login_key UNIQUE (login)
        )
        ",
    )
    .execute(pool)
    .await?;

    // stock_quantity carries a CHECK backstop; the transaction engine is the
    // only writer and never lets it go negative.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS products (
            id             BIGSERIAL PRIMARY KEY,
            name           TEXT NOT NULL,
            sku            TEXT NOT NULL,
            price          NUMERIC(10, 2) NOT NULL DEFAULT 0,
            stock_quantity INTEGER NOT NULL DEFAULT 0,
            supplier_id    BIGINT NULL,
            location_id    BIGINT NULL,
            CONSTRAINT products_sku_key UNIQUE (sku),
            CONSTRAINT products_stock_quantity_check CHECK (stock_quantity >= 0),
            CONSTRAINT products_supplier_id_fkey
                FOREIGN KEY (supplier_id) REFERENCES suppliers (id) ON DELETE SET NULL,
            CONSTRAINT products_location_id_fkey
                FOREIGN KEY (location_id) REFERENCES locations (id) ON DELETE SET NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    // Deleting a product takes its audit trail with it; deleting a user is
    // blocked while entries reference them.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS warehouse_logs (
            id              BIGSERIAL PRIMARY KEY,
            action_type     VARCHAR(3) NOT NULL,
            quantity_change INTEGER NOT NULL,
            created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
            user_id         BIGINT NOT NULL,
            product_id      BIGINT NOT NULL,
            CONSTRAINT warehouse_logs_action_type_check CHECK (action_type IN ('IN', 'OUT')),
            CONSTRAINT warehouse_logs_user_id_fkey
                FOREIGN KEY (user_id) REFERENCES users (id),
            CONSTRAINT warehouse_logs_product_id_fkey
                FOREIGN KEY (product_id) REFERENCES products (id) ON DELETE CASCADE
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"CREATE INDEX IF NOT EXISTS warehouse_logs_by_product ON warehouse_logs(product_id, id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
