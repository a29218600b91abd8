//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, OpenBaoClient, PgAuthService},
    database::{self, Db, RoleCheckError},
    domain::orders::{OrdersService, PgOrdersService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("database role is not safe for serving requests")]
    Role(#[source] RoleCheckError),
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or the connected role
    /// bypasses row-level security.
    pub async fn from_database_url(
        url: &str,
        openbao: OpenBaoClient,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Role)?;

        Ok(Self {
            orders: Arc::new(PgOrdersService::new(Db::new(pool.clone()))),
            auth: Arc::new(PgAuthService::new(pool, Arc::new(openbao))),
        })
    }
}
