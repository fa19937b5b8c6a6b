mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgUserStore, UserStore};

#[cfg(test)]
pub use repo::StoreError;
#[cfg(test)]
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
