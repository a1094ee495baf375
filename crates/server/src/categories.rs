//! Categories API endpoints

use api_types::category::{CategoryCreated, CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewCategoryCmd, UpdateCategoryCmd};
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState};

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        icon: category.icon,
        color: category.color,
    }
}

pub async fn list(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.list_categories(&user).await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let mut cmd = NewCategoryCmd::new(user, payload.name, payload.color);
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    let id = state.engine.new_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn update(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let mut cmd = UpdateCategoryCmd::new(user, id);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    let category = state.engine.update_category(cmd).await?;
    Ok(Json(view(category)))
}

pub async fn delete(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
