use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Name of the first blank field, if any.
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else {
            None
        }
    }
}

/// Response returned after a user is created.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for CreatedUserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

/// Response for an email lookup by name.
#[derive(Debug, Serialize)]
pub struct UserEmailResponse {
    pub name: String,
    pub email: String,
}
