//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query, query_scalar};
use thiserror::Error;

use crate::domain::users::records::UserUuid;

/// SQL used to set the calling user for row-level security.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

const ROLE_BYPASSES_RLS_SQL: &str =
    "SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = current_user";

#[derive(Debug, Error)]
pub enum RoleCheckError {
    #[error("database role `{0}` bypasses row-level security")]
    BypassesRls(String),

    #[error("failed to inspect database role")]
    Sql(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction scoped to `user` for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting user context fails.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_USER_CONTEXT_SQL)
            .bind(user.to_string())
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

/// Refuse roles that would silently skip the orders ownership policy.
///
/// # Errors
///
/// Returns [`RoleCheckError::BypassesRls`] for superusers and `BYPASSRLS` roles.
pub async fn ensure_rls_enforced_role(pool: &PgPool) -> Result<(), RoleCheckError> {
    let bypasses: bool = query_scalar(ROLE_BYPASSES_RLS_SQL).fetch_one(pool).await?;

    if bypasses {
        let role: String = query_scalar("SELECT current_user::text")
            .fetch_one(pool)
            .await?;

        return Err(RoleCheckError::BypassesRls(role));
    }

    Ok(())
}
