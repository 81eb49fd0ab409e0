//! Recurring rule endpoints.

use crate::{
    core::recurring,
    entities::user,
    server::{ApiResponse, ServerError, ServerState, done, ok},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RuleNew {
    pub kind: String,
    pub name: String,
    pub base_amount: i64,
    #[serde(default)]
    pub admin_fee: i64,
    pub wallet_id: i64,
    pub category_id: Option<i64>,
    pub day_of_month: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<crate::entities::recurring_rule::Model>>>, ServerError> {
    let rules = recurring::list_rules(&state.db, &user.username).await?;
    Ok(ok("recurring rules retrieved", rules))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RuleNew>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::recurring_rule::Model>>), ServerError> {
    let created = recurring::create_rule(
        &state.db,
        &user.username,
        recurring::NewRule {
            kind: payload.kind,
            name: payload.name,
            base_amount: payload.base_amount,
            admin_fee: payload.admin_fee,
            wallet_id: payload.wallet_id,
            category_id: payload.category_id,
            day_of_month: payload.day_of_month,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, ok("recurring rule created", created)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(rule_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    // Scope the lookup so callers cannot delete another user's rule.
    let owned = recurring::list_rules(&state.db, &user.username)
        .await?
        .into_iter()
        .any(|rule| rule.id == rule_id);
    if !owned {
        return Err(crate::errors::Error::RecurringRuleNotFound { id: rule_id }.into());
    }

    recurring::delete_rule(&state.db, rule_id).await?;
    Ok(done("recurring rule deleted"))
}

pub async fn apply(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ApplyRequest>,
) -> Result<Json<ApiResponse<Vec<recurring::AppliedRule>>>, ServerError> {
    let date = payload
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let applied = recurring::apply_due_rules(&state.db, &user.username, date).await?;
    Ok(ok("recurring rules applied", applied))
}
