use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,       // SERIAL, assigned by postgres
    pub name: String,
    pub email: String,
}

/// Result of a lookup by name.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserEmail {
    pub email: String,
}
