//! Per-test PostgreSQL databases inside one shared container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, query};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

pub(super) const SUPERUSER: &str = "threadline_test";
const SUPERUSER_PASSWORD: &str = "threadline_test_password";

struct SharedPostgres {
    _container: ContainerAsync<PostgresImage>,
    host: String,
    port: u16,
}

impl SharedPostgres {
    fn url(&self, user: &str, password: &str, database: &str) -> String {
        format!(
            "postgresql://{user}:{password}@{}:{}/{database}",
            self.host, self.port
        )
    }
}

static POSTGRES: Lazy<OnceCell<SharedPostgres>> = Lazy::new(OnceCell::new);

static DROP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn start_postgres() -> SharedPostgres {
    let container = PostgresImage::default()
        .with_user(SUPERUSER)
        .with_password(SUPERUSER_PASSWORD)
        .with_db_name(SUPERUSER)
        .start()
        .await
        .expect("failed to start PostgreSQL container");

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to read PostgreSQL container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    SharedPostgres {
        _container: container,
        host,
        port,
    }
}

async fn start_drop_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Some(postgres) = POSTGRES.get()
                && let Ok(mut conn) =
                    PgConnection::connect(&postgres.url(SUPERUSER, SUPERUSER_PASSWORD, "postgres"))
                        .await
            {
                let _dropped = query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
                    .execute(&mut conn)
                    .await;

                let _closed = conn.close().await;
            }
        }
    });

    sender
}

/// A freshly migrated database, dropped in the background once the value goes away.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    pub name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        DROP_SENDER.get_or_init(start_drop_task).await;

        let postgres = POSTGRES.get_or_init(start_postgres).await;

        let name = format!("threadline_test_{}", Uuid::now_v7().simple());

        let mut conn =
            PgConnection::connect(&postgres.url(SUPERUSER, SUPERUSER_PASSWORD, "postgres"))
                .await
                .expect("failed to connect to maintenance database");

        query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("failed to create test database");

        conn.close().await.expect("failed to close admin connection");

        let pool = PgPool::connect(&postgres.url(SUPERUSER, SUPERUSER_PASSWORD, &name))
            .await
            .expect("failed to connect to test database");

        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        Self { pool, name }
    }

    /// Superuser pool. Bypasses row-level security.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// URL for this database as another login role.
    pub fn url_as(&self, user: &str, password: &str) -> String {
        POSTGRES
            .get()
            .expect("container is started before any TestDb exists")
            .url(user, password, &self.name)
    }

    /// URL for the server's maintenance database as the superuser.
    pub fn maintenance_url(&self) -> String {
        POSTGRES
            .get()
            .expect("container is started before any TestDb exists")
            .url(SUPERUSER, SUPERUSER_PASSWORD, "postgres")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROP_SENDER.get() {
            let _sent = sender.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_database_is_migrated() {
        let db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name IN ('users', 'api_tokens', 'orders')",
        )
        .fetch_one(db.pool())
        .await
        .expect("failed to inspect schema");

        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn databases_are_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name, second.name);

        sqlx::query("INSERT INTO users (uuid, name) VALUES ($1, 'Spinning')")
            .bind(Uuid::now_v7())
            .execute(first.pool())
            .await
            .expect("failed to insert user");

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(second.pool())
            .await
            .expect("failed to count users");

        assert_eq!(users, 0);
    }
}
