//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query};

use crate::domain::users::UserUuid;

/// SQL used to set the acting storefront user for row-level security.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction with no user context.
    ///
    /// Back-office operations (catalog management, order fulfilment,
    /// message triage) run here; user-owned rows stay protected by RLS
    /// unless the connecting role owns the tables.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction acting as the given storefront user.
    ///
    /// Sets `app.current_user_uuid` for the row-level-security policies on
    /// carts, orders, subscriptions and loyalty accounts, so every query in
    /// the transaction only sees that user's rows.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the user
    /// context fails.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_USER_CONTEXT_SQL)
            .bind(user.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}
