//! Postgres-backed user store and credential verification.
//!
//! Password hashes never leave this module: domain [`User`] values carry
//! identity and role only, and [`UserStore::verify_credentials`] is the one
//! place a stored hash is compared against a plaintext candidate.

use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use stockroom_auth::{HashedPassword, NewUser, User, UserUpdate};
use stockroom_core::{DomainError, UserId};

use crate::error::{is_foreign_key_violation, is_unique_violation, StoreError, StoreResult};

/// CRUD access to accounts plus credential verification.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, user), fields(login = %user.login()), err)]
    pub async fn create_user(&self, user: &NewUser) -> StoreResult<User> {
        let taken: bool = sqlx::query_scalar(r"SELECT EXISTS (SELECT 1 FROM users WHERE login = $1)")
            .bind(user.login())
            .fetch_one(&self.pool)
            .await?;
        if taken {
            return Err(DomainError::conflict("login already exists").into());
        }

        let hash = HashedPassword::from_plain(user.password()).map_err(DomainError::from)?;

        let row = sqlx::query(
            r"
            INSERT INTO users (login, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, login, is_admin
            ",
        )
        .bind(user.login())
        .bind(hash.as_str())
        .bind(user.is_admin())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Domain(DomainError::conflict("login already exists"))
            } else {
                StoreError::Storage(e)
            }
        })?;

        Ok(UserRow::from_row(&row)?.into())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(r"SELECT id, login, is_admin FROM users WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(r"SELECT id, login, is_admin FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Ok(UserRow::from_row(row)?.into()))
            .collect()
    }

    /// Partially update a user. A new password is hashed before it is
    /// written; `None` fields keep their stored value.
    #[instrument(skip(self, update), fields(id = %id), err)]
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> StoreResult<User> {
        if let Some(login) = update.login() {
            let taken: bool = sqlx::query_scalar(
                r"SELECT EXISTS (SELECT 1 FROM users WHERE login = $1 AND id <> $2)",
            )
            .bind(login)
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await?;
            if taken {
                return Err(DomainError::conflict("login already exists").into());
            }
        }

        let hash = match update.password() {
            Some(plain) => Some(HashedPassword::from_plain(plain).map_err(DomainError::from)?),
            None => None,
        };

        let row = sqlx::query(
            r"
            UPDATE users
            SET login = COALESCE($2, login),
                password_hash = COALESCE($3, password_hash),
                is_admin = COALESCE($4, is_admin)
            WHERE id = $1
            RETURNING id, login, is_admin
            ",
        )
        .bind(id.as_i64())
        .bind(update.login())
        .bind(hash.as_ref().map(HashedPassword::as_str))
        .bind(update.is_admin())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Domain(DomainError::conflict("login already exists"))
            } else {
                StoreError::Storage(e)
            }
        })?;

        match row {
            Some(row) => Ok(UserRow::from_row(&row)?.into()),
            None => Err(DomainError::not_found("user").into()),
        }
    }

    /// Delete a user. Refused while ledger entries still reference them,
    /// since the ledger is append-only history.
    #[instrument(skip(self), fields(id = %id), err)]
    pub async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let result = sqlx::query(r"DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::Domain(DomainError::conflict("user has ledger entries"))
                } else {
                    StoreError::Storage(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("user").into());
        }
        Ok(())
    }

    /// Check a login/password pair against the stored hash.
    ///
    /// Returns `None` for an unknown login and for a wrong password alike;
    /// callers cannot tell the two apart.
    #[instrument(skip(self, password), fields(login = %login), err)]
    pub async fn verify_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> StoreResult<Option<User>> {
        let row = sqlx::query(r"SELECT id, login, is_admin, password_hash FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let hash: String = row.try_get("password_hash")?;
        if !HashedPassword::from_hash(hash).verify(password) {
            return Ok(None);
        }

        Ok(Some(UserRow::from_row(&row)?.into()))
    }

    /// Create the administrator account unless the login is already taken.
    /// Returns whether a row was inserted. Run once at startup.
    #[instrument(skip(self, password), fields(login = %login), err)]
    pub async fn ensure_admin(&self, login: &str, password: &str) -> StoreResult<bool> {
        let user = NewUser::new(login, password, true)?;
        let hash = HashedPassword::from_plain(user.password()).map_err(DomainError::from)?;

        let result = sqlx::query(
            r"
            INSERT INTO users (login, password_hash, is_admin)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (login) DO NOTHING
            ",
        )
        .bind(user.login())
        .bind(hash.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

struct UserRow {
    id: i64,
    login: String,
    is_admin: bool,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            login: row.try_get("login")?,
            is_admin: row.try_get("is_admin")?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_record(UserId::new(row.id), row.login, row.is_admin)
    }
}
