//! Expense and income endpoints.
//!
//! Edits address transactions by id and are hard errors when the id does not
//! exist; there is no upsert path. Edits may target archived rows, which
//! never recomputes the archive's frozen totals.

use crate::{
    core::{expense, income, wallet},
    entities::{Period, user},
    errors::Error,
    server::{ApiResponse, ServerError, ServerState, done, ok},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub wallet_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub base_amount: i64,
    #[serde(default)]
    pub admin_fee: i64,
    /// Category for a regular expense; ignored when `splits` is present
    pub category_id: Option<i64>,
    /// Per-category shares for a split expense
    pub splits: Option<Vec<expense::SplitShare>>,
    pub saving_goal_id: Option<i64>,
    pub debt_id: Option<i64>,
}

impl ExpensePayload {
    fn into_new_expense(self) -> Result<expense::NewExpense, Error> {
        let assignment = match self.splits {
            Some(splits) if !splits.is_empty() => expense::CategoryAssignment::Split { splits },
            _ => {
                let category_id = self.category_id.ok_or_else(|| Error::Validation {
                    message: "Expense requires a category or splits".to_string(),
                })?;
                expense::CategoryAssignment::Single { category_id }
            }
        };

        Ok(expense::NewExpense {
            wallet_id: self.wallet_id,
            date: self.date,
            notes: self.notes,
            base_amount: self.base_amount,
            admin_fee: self.admin_fee,
            assignment,
            saving_goal_id: self.saving_goal_id,
            debt_id: self.debt_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IncomePayload {
    pub wallet_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub base_amount: i64,
    #[serde(default)]
    pub admin_fee: i64,
}

impl From<IncomePayload> for income::NewIncome {
    fn from(value: IncomePayload) -> Self {
        Self {
            wallet_id: value.wallet_id,
            date: value.date,
            notes: value.notes,
            base_amount: value.base_amount,
            admin_fee: value.admin_fee,
        }
    }
}

async fn assert_owned_wallet(
    state: &ServerState,
    user: &user::Model,
    wallet_id: i64,
) -> Result<(), ServerError> {
    wallet::get_wallet_by_id(&state.db, wallet_id)
        .await?
        .filter(|w| w.user_id == user.username)
        .map(|_| ())
        .ok_or_else(|| Error::WalletNotFound { id: wallet_id }.into())
}

/// Verifies a transaction belongs to one of the caller's periods.
async fn assert_owned_period(
    state: &ServerState,
    user: &user::Model,
    period_id: i64,
    transaction_id: i64,
) -> Result<(), ServerError> {
    Period::find_by_id(period_id)
        .one(&state.db)
        .await
        .map_err(Error::from)?
        .filter(|p| p.user_id == user.username)
        .map(|_| ())
        .ok_or_else(|| Error::TransactionNotFound { id: transaction_id }.into())
}

pub async fn expense_create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::expense::Model>>), ServerError> {
    assert_owned_wallet(&state, &user, payload.wallet_id).await?;

    let new = payload.into_new_expense()?;
    let created = expense::record_expense(&state.db, &user.username, new).await?;
    Ok((StatusCode::CREATED, ok("expense recorded", created)))
}

pub async fn expense_update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<ApiResponse<crate::entities::expense::Model>>, ServerError> {
    let existing = expense::get_expense_by_id(&state.db, expense_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: expense_id })?;
    assert_owned_period(&state, &user, existing.period_id, expense_id).await?;
    assert_owned_wallet(&state, &user, payload.wallet_id).await?;

    let new = payload.into_new_expense()?;
    let updated = expense::update_expense(&state.db, expense_id, new).await?;
    Ok(ok("expense updated", updated))
}

pub async fn expense_delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let existing = expense::get_expense_by_id(&state.db, expense_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: expense_id })?;
    assert_owned_period(&state, &user, existing.period_id, expense_id).await?;

    expense::delete_expense(&state.db, expense_id).await?;
    Ok(done("expense deleted"))
}

pub async fn income_create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomePayload>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::income::Model>>), ServerError> {
    assert_owned_wallet(&state, &user, payload.wallet_id).await?;

    let created = income::record_income(&state.db, &user.username, payload.into()).await?;
    Ok((StatusCode::CREATED, ok("income recorded", created)))
}

pub async fn income_update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(income_id): Path<i64>,
    Json(payload): Json<IncomePayload>,
) -> Result<Json<ApiResponse<crate::entities::income::Model>>, ServerError> {
    let existing = income::get_income_by_id(&state.db, income_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: income_id })?;
    assert_owned_period(&state, &user, existing.period_id, income_id).await?;
    assert_owned_wallet(&state, &user, payload.wallet_id).await?;

    let updated = income::update_income(&state.db, income_id, payload.into()).await?;
    Ok(ok("income updated", updated))
}

pub async fn income_delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(income_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let existing = income::get_income_by_id(&state.db, income_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: income_id })?;
    assert_owned_period(&state, &user, existing.period_id, income_id).await?;

    income::delete_income(&state.db, income_id).await?;
    Ok(done("income deleted"))
}
