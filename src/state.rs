use crate::config::AppConfig;
use crate::db::{ConnectionProvider, PgConnector};
use crate::users::{PgUserStore, UserStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn init(config: &AppConfig) -> Self {
        let connector = Arc::new(PgConnector::new(&config.database)) as Arc<dyn ConnectionProvider>;
        let users = Arc::new(PgUserStore::new(connector)) as Arc<dyn UserStore>;
        Self { users }
    }

    pub fn with_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use axum::async_trait;

    use crate::users::{StoreError, User, UserStore};

    /// In-memory `UserStore` for router tests.
    #[derive(Default)]
    pub struct MemoryUserStore {
        rows: Mutex<Vec<User>>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl MemoryUserStore {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Connect(sqlx::Error::PoolClosed));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn create(&self, name: &str, email: &str) -> Result<User, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let user = User {
                id: rows.len() as i32 + 1,
                name: name.to_string(),
                email: email.to_string(),
            };
            rows.push(user.clone());
            Ok(user)
        }

        async fn find_email_by_name(&self, name: &str) -> Result<Option<String>, StoreError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|u| u.name == name).map(|u| u.email.clone()))
        }
    }
}
