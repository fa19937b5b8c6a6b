use axum::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgConnection},
    ConnectOptions,
};
use tracing::debug;

use crate::config::DatabaseConfig;

/// Database every PostgreSQL server ships with; used only to create the target database.
pub const ADMIN_DATABASE: &str = "postgres";

/// Hands out live connections to the application database.
///
/// The per-request implementation opens a fresh connection each time; a pooled
/// implementation can be dropped in behind the same trait.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connect(&self) -> Result<PgConnection, sqlx::Error>;
}

/// Opens one unpooled connection per call.
#[derive(Clone)]
pub struct PgConnector {
    options: PgConnectOptions,
    database: String,
}

impl PgConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);
        Self {
            options,
            database: config.name.clone(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection to the server's administrative database.
    pub async fn connect_admin(&self) -> Result<PgConnection, sqlx::Error> {
        debug!(database = ADMIN_DATABASE, "opening admin connection");
        self.options.clone().database(ADMIN_DATABASE).connect().await
    }
}

#[async_trait]
impl ConnectionProvider for PgConnector {
    async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        debug!(database = self.database(), "opening connection");
        self.options.connect().await
    }
}

/// Quotes a string as a PostgreSQL identifier, for statements like
/// `CREATE DATABASE` that cannot take bind parameters.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
