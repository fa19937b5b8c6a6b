use anyhow::Context;
use sqlx::{Connection, Executor};
use tracing::{info, instrument};

use crate::db::{quote_ident, ConnectionProvider, PgConnector};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub database_created: bool,
}

/// Ensures the target database and the `users` table exist.
///
/// Safe to run on every startup; repeated runs only perform existence checks.
#[instrument(skip(connector), fields(database = connector.database()))]
pub async fn run(connector: &PgConnector) -> anyhow::Result<BootstrapReport> {
    let database_created = ensure_database(connector).await?;
    ensure_users_table(connector).await?;
    Ok(BootstrapReport { database_created })
}

async fn ensure_database(connector: &PgConnector) -> anyhow::Result<bool> {
    let name = connector.database();
    info!("connecting to the administrative database");
    let mut conn = connector
        .connect_admin()
        .await
        .context("connect to administrative database")?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut conn)
        .await
        .context("check whether database exists")?;

    let created = if exists.is_some() {
        info!(database = name, "database already exists");
        false
    } else {
        info!(database = name, "database does not exist; creating it");
        conn.execute(format!("CREATE DATABASE {}", quote_ident(name)).as_str())
            .await
            .with_context(|| format!("create database {name}"))?;
        info!(database = name, "database created");
        true
    };

    conn.close().await.context("close administrative connection")?;
    Ok(created)
}

async fn ensure_users_table(connector: &PgConnector) -> anyhow::Result<()> {
    info!("connecting to the target database to check the users table");
    let mut conn = connector
        .connect()
        .await
        .context("connect to target database")?;

    conn.execute(CREATE_USERS_TABLE)
        .await
        .context("create users table")?;
    info!("table 'users' is ready");

    conn.close().await.context("close target connection")?;
    Ok(())
}
