//! Wallet-to-wallet transfer endpoint.

use crate::{
    core::transfer,
    entities::user,
    server::{ApiResponse, ServerError, ServerState, ok},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransferNew {
    pub from_wallet_id: i64,
    pub to_wallet_id: i64,
    pub amount: i64,
    #[serde(default)]
    pub admin_fee: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<ApiResponse<transfer::TransferReceipt>>), ServerError> {
    let receipt = transfer::transfer_funds(
        &state.db,
        &user.username,
        payload.from_wallet_id,
        payload.to_wallet_id,
        payload.amount,
        payload.admin_fee,
        payload.date,
        payload.notes,
    )
    .await?;

    Ok((StatusCode::CREATED, ok("transfer recorded", receipt)))
}
