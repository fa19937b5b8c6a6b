use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    state::AppState,
    users::dto::{CreateUserRequest, CreatedUserResponse, UserEmailResponse},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", post(create_user))
        .route("/users", post(create_user))
        .route("/users/:name", get(get_user_email))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreatedUserResponse>, (StatusCode, String)> {
    if let Some(field) = payload.blank_field() {
        warn!(field, "blank field in create user request");
        return Err((StatusCode::BAD_REQUEST, format!("{field} must not be empty")));
    }

    let user = match state.users.create(&payload.name, &payload.email).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "error inserting user");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error inserting user".into(),
            ));
        }
    };

    info!(user_id = user.id, name = %user.name, "user created");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_user_email(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UserEmailResponse>, (StatusCode, String)> {
    match state.users.find_email_by_name(&name).await {
        Ok(Some(email)) => Ok(Json(UserEmailResponse { name, email })),
        Ok(None) => {
            info!(%name, "user not found");
            Err((StatusCode::NOT_FOUND, "User not found".into()))
        }
        Err(e) => {
            error!(error = %e, %name, "error retrieving user");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error retrieving user".into(),
            ))
        }
    }
}
