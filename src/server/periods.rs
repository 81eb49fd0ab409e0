//! Period endpoints: the open period, budget upserts, the close operation,
//! and the archive.

use crate::{
    core::period,
    entities::user,
    server::{ApiResponse, ServerError, ServerState, ok},
};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

/// The open period together with its budget snapshot.
#[derive(Debug, Serialize)]
pub struct PeriodView {
    #[serde(flatten)]
    pub period: crate::entities::period::Model,
    pub budgets: Vec<crate::entities::category_budget::Model>,
}

pub async fn current(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<PeriodView>>, ServerError> {
    let open = period::ensure_current_period(&state.db, &user.username).await?;
    let budgets = period::period_budgets(&state.db, open.id).await?;

    Ok(ok(
        "current period retrieved",
        PeriodView {
            period: open,
            budgets,
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct BudgetUpsert {
    pub category_id: i64,
    pub budget: i64,
}

pub async fn set_budget(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<Json<ApiResponse<crate::entities::category_budget::Model>>, ServerError> {
    let row = period::set_category_budget(
        &state.db,
        &user.username,
        payload.category_id,
        payload.budget,
    )
    .await?;

    Ok(ok("budget saved", row))
}

pub async fn close(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<period::PeriodCloseReport>>, ServerError> {
    let report = period::close_period(&state.db, &user.username).await?;
    let summary = period::format_close_summary(&report);
    Ok(ok(summary, report))
}

pub async fn archive(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<crate::entities::period::Model>>>, ServerError> {
    let archived = period::archived_periods(&state.db, &user.username).await?;
    Ok(ok("archived periods retrieved", archived))
}
