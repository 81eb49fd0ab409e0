//! Reporting endpoints.

use crate::{
    core::report,
    entities::user,
    server::{ApiResponse, ServerError, ServerState, ok},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<report::PeriodSummary>>, ServerError> {
    let summary = report::period_summary(&state.db, &user.username).await?;
    Ok(ok("period summary built", summary))
}

#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub total: i64,
}

pub async fn goal_progress(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(goal_id): Path<i64>,
) -> Result<Json<ApiResponse<ProgressView>>, ServerError> {
    let total = report::saving_goal_progress(&state.db, &user.username, goal_id).await?;
    Ok(ok("goal progress computed", ProgressView { total }))
}

pub async fn debt_paid(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(debt_id): Path<i64>,
) -> Result<Json<ApiResponse<ProgressView>>, ServerError> {
    let total = report::debt_paid_total(&state.db, &user.username, debt_id).await?;
    Ok(ok("debt payments computed", ProgressView { total }))
}

#[derive(Debug, Deserialize)]
pub struct GoalNew {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub target_amount: i64,
}

pub async fn list_goals(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<crate::entities::saving_goal::Model>>>, ServerError> {
    let goals = report::list_saving_goals(&state.db, &user.username).await?;
    Ok(ok("saving goals retrieved", goals))
}

pub async fn create_goal(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::saving_goal::Model>>), ServerError> {
    let created = report::create_saving_goal(
        &state.db,
        &user.username,
        payload.name,
        payload.icon,
        payload.target_amount,
    )
    .await?;
    Ok((StatusCode::CREATED, ok("saving goal created", created)))
}

#[derive(Debug, Deserialize)]
pub struct DebtNew {
    pub name: String,
    pub total_amount: i64,
}

pub async fn list_debts(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<crate::entities::debt::Model>>>, ServerError> {
    let debts = report::list_debts(&state.db, &user.username).await?;
    Ok(ok("debts retrieved", debts))
}

pub async fn create_debt(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::debt::Model>>), ServerError> {
    let created =
        report::create_debt(&state.db, &user.username, payload.name, payload.total_amount).await?;
    Ok((StatusCode::CREATED, ok("debt created", created)))
}
