use std::{fmt, net::SocketAddr};

use anyhow::Context;
use serde::Deserialize;

/// Connection settings for the PostgreSQL server.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl HttpConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))?;
        Ok(addr)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(v) if !v.is_empty() => Ok(v),
                _ => anyhow::bail!(
                    "Environment variables POSTGRES_USER and POSTGRES_PASSWORD must be set ({key} is missing)"
                ),
            }
        };

        let database = DatabaseConfig {
            host: lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".into()),
            port: match lookup("POSTGRES_PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .with_context(|| format!("POSTGRES_PORT is not a valid port: {v}"))?,
                None => 5432,
            },
            name: lookup("POSTGRES_NAME").unwrap_or_else(|| "users".into()),
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
        };

        let http = HttpConfig {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: match lookup("APP_PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .with_context(|| format!("APP_PORT is not a valid port: {v}"))?,
                None => 8080,
            },
        };

        Ok(Self { database, http })
    }
}
