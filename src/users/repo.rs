use std::sync::Arc;

use axum::async_trait;
use sqlx::{postgres::PgConnection, Connection};
use tracing::warn;

use crate::db::ConnectionProvider;
use crate::users::repo_types::{User, UserEmail};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Storage operations the user handlers depend on.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the stored row with its generated id.
    async fn create(&self, name: &str, email: &str) -> Result<User, StoreError>;

    /// Email of the first user found with this name.
    async fn find_email_by_name(&self, name: &str) -> Result<Option<String>, StoreError>;
}

/// `UserStore` over PostgreSQL, one connection per call.
pub struct PgUserStore {
    connector: Arc<dyn ConnectionProvider>,
}

impl PgUserStore {
    pub fn new(connector: Arc<dyn ConnectionProvider>) -> Self {
        Self { connector }
    }

    async fn acquire(&self) -> Result<PgConnection, StoreError> {
        self.connector.connect().await.map_err(StoreError::Connect)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, name: &str, email: &str) -> Result<User, StoreError> {
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await?;

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&mut *tx)
        .await;

        let user = match inserted {
            Ok(u) => u,
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback failed");
                }
                return Err(StoreError::Query(e));
            }
        };
        tx.commit().await?;

        release(conn).await;
        Ok(user)
    }

    async fn find_email_by_name(&self, name: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.acquire().await?;

        // name is not unique; whichever row postgres returns first wins
        let row = sqlx::query_as::<_, UserEmail>(
            r#"
            SELECT email
            FROM users
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut conn)
        .await?;

        release(conn).await;
        Ok(row.map(|r| r.email))
    }
}

/// Graceful close; on error paths the connection is simply dropped.
async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "closing connection failed");
    }
}

#[cfg(test)]
mod pg_tests {
    use super::*;
    use crate::{bootstrap, config::AppConfig, db::PgConnector};

    async fn store() -> PgUserStore {
        let config = AppConfig::from_env().expect("postgres env");
        let connector = PgConnector::new(&config.database);
        bootstrap::run(&connector).await.expect("bootstrap");
        PgUserStore::new(Arc::new(connector))
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (POSTGRES_USER/POSTGRES_PASSWORD)"]
    async fn create_assigns_increasing_ids_and_lookup_finds_email() {
        let store = store().await;
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let name = format!("pg-test-user-{nanos}");

        let first = store.create(&name, "one@example.com").await.unwrap();
        let second = store.create(&name, "two@example.com").await.unwrap();
        assert!(first.id > 0);
        assert!(second.id > first.id);

        let email = store
            .find_email_by_name(&name)
            .await
            .unwrap()
            .expect("row exists");
        assert!(email == "one@example.com" || email == "two@example.com");
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (POSTGRES_USER/POSTGRES_PASSWORD)"]
    async fn lookup_of_unknown_name_is_none() {
        let store = store().await;
        let email = store
            .find_email_by_name("definitely-not-a-stored-name")
            .await
            .unwrap();
        assert!(email.is_none());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL (POSTGRES_USER/POSTGRES_PASSWORD)"]
    async fn rejected_insert_rolls_back_and_store_stays_usable() {
        let store = store().await;
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let name = format!("pg-rollback-user-{nanos}");

        // postgres rejects NUL bytes in text values
        let err = store.create(&name, "bad\0email").await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
        assert!(store.find_email_by_name(&name).await.unwrap().is_none());

        let user = store.create(&name, "good@example.com").await.unwrap();
        assert!(user.id > 0);
        assert_eq!(
            store.find_email_by_name(&name).await.unwrap().as_deref(),
            Some("good@example.com")
        );
    }

    #[tokio::test]
    async fn unreachable_database_is_a_connect_error() {
        let config = crate::config::DatabaseConfig {
            host: "127.0.0.1".into(),
            port: 1,
            name: "users".into(),
            user: "app".into(),
            password: "secret".into(),
        };
        let store = PgUserStore::new(Arc::new(PgConnector::new(&config)));

        let err = store.find_email_by_name("Alice").await.unwrap_err();
        assert!(matches!(err, StoreError::Connect(_)));
    }
}
