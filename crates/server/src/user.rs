//! Registration. The only endpoint reachable without credentials.

use api_types::user::{UserCreated, UserNew};
use axum::{Json, extract::State, http::StatusCode};
use engine::NewUserCmd;

use crate::{ServerError, server::ServerState};

/// Create a user together with the default accounts and categories.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let mut cmd = NewUserCmd::new(payload.username, payload.password);
    if let Some(display_name) = payload.display_name {
        cmd = cmd.display_name(display_name);
    }
    let username = state.engine.create_user(cmd).await?;
    Ok((StatusCode::CREATED, Json(UserCreated { username })))
}
