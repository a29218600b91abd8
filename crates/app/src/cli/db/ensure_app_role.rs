use clap::Args;
use sqlx::{Postgres, Transaction, query, query_scalar};
use threadline_app::database;

const ROLE_FLAGS: &str = "LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS";

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Role the JSON API connects as
    #[arg(long, default_value = "threadline_app")]
    role_name: String,

    /// Password to set on the role
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Statements that leave `role` able to read and write every table but never
/// bypass the orders ownership policy.
fn role_statements(role: &str, password: &str, database: &str, exists: bool) -> Vec<String> {
    let verb = if exists { "ALTER" } else { "CREATE" };

    vec![
        format!("{verb} ROLE {role} {ROLE_FLAGS} PASSWORD {password}"),
        format!("GRANT CONNECT ON DATABASE {database} TO {role}"),
        format!("GRANT USAGE ON SCHEMA public TO {role}"),
        format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role}"),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role}"
        ),
    ]
}

async fn quoted(
    tx: &mut Transaction<'_, Postgres>,
    function: &str,
    value: &str,
) -> Result<String, String> {
    query_scalar(&format!("SELECT {function}($1)"))
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to {function} value: {error}"))
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role-name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Role identifiers cannot be bound as parameters.
    let role = quoted(&mut tx, "quote_ident", &args.role_name).await?;
    let password = quoted(&mut tx, "quote_literal", &args.password).await?;

    let database: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to check role existence: {error}"))?;

    for statement in role_statements(&role, &password, &database, exists) {
        query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply role change: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_role_is_created_without_rls_bypass() {
        let statements = role_statements("\"app\"", "'pw'", "\"threadline\"", false);

        assert_eq!(
            statements.first().map(String::as_str),
            Some(
                "CREATE ROLE \"app\" LOGIN NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION \
                 NOBYPASSRLS PASSWORD 'pw'"
            )
        );
    }

    #[test]
    fn existing_role_is_altered() {
        let statements = role_statements("app", "'pw'", "threadline", true);

        assert!(statements.iter().any(|sql| sql.starts_with("ALTER ROLE app ")));
        assert!(statements.iter().all(|sql| !sql.starts_with("CREATE ROLE")));
    }
}
