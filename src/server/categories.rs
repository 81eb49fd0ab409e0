//! Category endpoints.

use crate::{
    core::category,
    entities::user,
    errors::Error,
    server::{ApiResponse, ServerError, ServerState, done, ok},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CategoryNew {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_essential: bool,
    #[serde(default)]
    pub is_debt_category: bool,
    #[serde(default)]
    pub budget: i64,
}

#[derive(Debug, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
}

async fn assert_owned(
    state: &ServerState,
    user: &user::Model,
    category_id: i64,
) -> Result<(), ServerError> {
    category::get_category_by_id(&state.db, category_id)
        .await?
        .filter(|c| c.user_id == user.username)
        .map(|_| ())
        .ok_or_else(|| Error::CategoryNotFound { id: category_id }.into())
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<crate::entities::category::Model>>>, ServerError> {
    let categories = category::list_categories(&state.db, &user.username).await?;
    Ok(ok("categories retrieved", categories))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::category::Model>>), ServerError> {
    let created = category::create_category(
        &state.db,
        &user.username,
        payload.name,
        payload.icon,
        payload.is_essential,
        payload.is_debt_category,
        payload.budget,
    )
    .await?;

    Ok((StatusCode::CREATED, ok("category created", created)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<ApiResponse<crate::entities::category::Model>>, ServerError> {
    assert_owned(&state, &user, category_id).await?;

    let updated =
        category::update_category(&state.db, category_id, payload.name, payload.icon).await?;
    Ok(ok("category updated", updated))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    assert_owned(&state, &user, category_id).await?;
    category::delete_category(&state.db, category_id).await?;
    Ok(done("category deleted"))
}
