//! Wallet endpoints.

use crate::{
    core::wallet,
    entities::user,
    errors::Error,
    server::{ApiResponse, ServerError, ServerState, done, ok},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// A wallet together with its balance scoped to the open period.
#[derive(Debug, Serialize)]
pub struct WalletView {
    pub id: i64,
    pub name: String,
    pub icon: String,
    /// Carried-over balance at the start of the open period
    pub initial_balance: i64,
    /// `initial_balance` plus the open period's net flow
    pub current_balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct WalletNew {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub initial_balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct WalletUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub initial_balance: Option<i64>,
}

async fn owned_wallet(
    state: &ServerState,
    user: &user::Model,
    wallet_id: i64,
) -> Result<crate::entities::wallet::Model, ServerError> {
    wallet::get_wallet_by_id(&state.db, wallet_id)
        .await?
        .filter(|w| w.user_id == user.username)
        .ok_or_else(|| Error::WalletNotFound { id: wallet_id }.into())
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<WalletView>>>, ServerError> {
    let wallets = wallet::list_wallets(&state.db, &user.username).await?;

    let mut views = Vec::with_capacity(wallets.len());
    for w in wallets {
        let current_balance = wallet::current_balance(&state.db, &w).await?;
        views.push(WalletView {
            id: w.id,
            name: w.name,
            icon: w.icon,
            initial_balance: w.initial_balance,
            current_balance,
        });
    }

    Ok(ok("wallets retrieved", views))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<ApiResponse<crate::entities::wallet::Model>>), ServerError> {
    let created = wallet::create_wallet(
        &state.db,
        &user.username,
        payload.name,
        payload.icon,
        payload.initial_balance,
    )
    .await?;

    Ok((StatusCode::CREATED, ok("wallet created", created)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<i64>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<ApiResponse<crate::entities::wallet::Model>>, ServerError> {
    owned_wallet(&state, &user, wallet_id).await?;

    let updated = wallet::update_wallet(
        &state.db,
        wallet_id,
        payload.name,
        payload.icon,
        payload.initial_balance,
    )
    .await?;

    Ok(ok("wallet updated", updated))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    owned_wallet(&state, &user, wallet_id).await?;
    wallet::delete_wallet(&state.db, wallet_id).await?;
    Ok(done("wallet deleted"))
}

#[derive(Debug, Serialize)]
pub struct NetWorth {
    pub net_worth: i64,
}

pub async fn networth(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<NetWorth>>, ServerError> {
    let net_worth = wallet::net_worth(&state.db, &user.username).await?;
    Ok(ok("net worth computed", NetWorth { net_worth }))
}
