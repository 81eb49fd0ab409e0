//! Thin JSON surface over the core operations.
//!
//! Every route sits behind a bearer-token middleware that resolves the
//! `Authorization` header against the `users` table and inserts the matched
//! user into the request extensions. Responses use a uniform envelope:
//! `{ "success": bool, "message": string, "data": ... }`, where `message`
//! carries the error's `Display` text verbatim on failure.

use crate::{entities::user, errors::Error};
use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::{DatabaseConnection, prelude::*};
use serde::Serialize;

mod categories;
mod periods;
mod recurring;
mod report;
mod scan;
mod transactions;
mod transfer;
mod wallets;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
}

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Successful envelope with a payload.
fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

/// Successful envelope without a payload.
fn done(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
    })
}

/// Error wrapper so core errors convert straight into HTTP responses.
pub struct ServerError(Error);

impl From<Error> for ServerError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

fn status_for_error(err: &Error) -> StatusCode {
    match err {
        Error::SessionInvalid => StatusCode::UNAUTHORIZED,
        Error::WalletNotFound { .. }
        | Error::CategoryNotFound { .. }
        | Error::PeriodNotFound
        | Error::TransactionNotFound { .. }
        | Error::RecurringRuleNotFound { .. }
        | Error::SavingGoalNotFound { .. }
        | Error::DebtNotFound { .. } => StatusCode::NOT_FOUND,
        Error::WalletInUse { .. } | Error::EssentialCategory { .. } => StatusCode::CONFLICT,
        Error::InvalidAmount { .. }
        | Error::SplitMismatch { .. }
        | Error::SameWalletTransfer
        | Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Config { .. } => StatusCode::BAD_REQUEST,
        Error::Database(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = status_for_error(&self.0);
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {}", self.0);
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(ApiResponse::<()> {
                success: false,
                message,
                data: None,
            }),
        )
            .into_response()
    }
}

async fn auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(bearer) = bearer else {
        return Err(Error::SessionInvalid.into());
    };

    let found = user::Entity::find()
        .filter(user::Column::Token.eq(bearer.token()))
        .one(&state.db)
        .await
        .map_err(Error::from)?;

    let Some(found) = found else {
        return Err(Error::SessionInvalid.into());
    };

    request.extensions_mut().insert(found);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route(
            "/wallets/{id}",
            patch(wallets::update).delete(wallets::remove),
        )
        .route("/networth", get(wallets::networth))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::remove),
        )
        .route("/period", get(periods::current))
        .route("/period/budgets", put(periods::set_budget))
        .route("/period/close", post(periods::close))
        .route("/periods/archive", get(periods::archive))
        .route("/expenses", post(transactions::expense_create))
        .route(
            "/expenses/{id}",
            patch(transactions::expense_update).delete(transactions::expense_delete),
        )
        .route("/incomes", post(transactions::income_create))
        .route(
            "/incomes/{id}",
            patch(transactions::income_update).delete(transactions::income_delete),
        )
        .route("/transfer", post(transfer::create))
        .route(
            "/recurring",
            get(recurring::list).post(recurring::create),
        )
        .route("/recurring/{id}", delete(recurring::remove))
        .route("/recurring/apply", post(recurring::apply))
        .route("/scan/draft", post(scan::draft))
        .route("/report", get(report::summary))
        .route("/goals", get(report::list_goals).post(report::create_goal))
        .route("/goals/{id}/progress", get(report::goal_progress))
        .route("/debts", get(report::list_debts).post(report::create_debt))
        .route("/debts/{id}/paid", get(report::debt_paid))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Binds the configured address and serves until shutdown.
pub async fn run(db: DatabaseConnection, bind_addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    run_with_listener(db, listener).await
}

/// Serves on an already-bound listener.
pub async fn run_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("server listening on {addr}");

    axum::serve(listener, router(ServerState { db })).await
}

/// Spawns the server on a background task, returning the bound address.
pub fn spawn_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn session_invalid_maps_to_401() {
        let res = ServerError::from(Error::SessionInvalid).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(Error::WalletNotFound { id: 1 }).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = ServerError::from(Error::PeriodNotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_422() {
        let res = ServerError::from(Error::InvalidAmount { amount: -5 }).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(Error::SameWalletTransfer).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(Error::Validation {
            message: "Wallet name cannot be empty".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn conflict_maps_to_409() {
        let res = ServerError::from(Error::EssentialCategory {
            name: "Transfer Between Wallets".to_string(),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected_with_envelope() {
        let db = setup_test_db().await.unwrap();
        let app = router(ServerState { db });

        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/wallets")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "session invalid");
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let db = setup_test_db().await.unwrap();
        create_test_user(&db, TEST_USER, "good-token").await.unwrap();
        let app = router(ServerState { db });

        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/wallets")
                    .header("Authorization", "Bearer bad-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn goal_progress_is_scoped_to_its_owner() {
        let db = setup_test_db().await.unwrap();
        create_test_user(&db, TEST_USER, "owner-token").await.unwrap();
        create_test_user(&db, "intruder", "intruder-token")
            .await
            .unwrap();

        let wallet = create_test_wallet(&db, "Cash").await.unwrap();
        let cat = create_test_category(&db, "Nabung", 0).await.unwrap();
        let goal = crate::core::report::create_saving_goal(
            &db,
            TEST_USER,
            "Liburan".to_string(),
            String::new(),
            1_000_000,
        )
        .await
        .unwrap();
        crate::core::expense::record_expense(
            &db,
            TEST_USER,
            crate::core::expense::NewExpense {
                wallet_id: wallet.id,
                date: test_date(),
                notes: String::new(),
                base_amount: 10_000,
                admin_fee: 0,
                assignment: crate::core::expense::CategoryAssignment::Single {
                    category_id: cat.id,
                },
                saving_goal_id: Some(goal.id),
                debt_id: None,
            },
        )
        .await
        .unwrap();

        let uri = format!("/goals/{}/progress", goal.id);

        // Another authenticated user cannot read the owner's totals.
        let res = router(ServerState { db: db.clone() })
            .oneshot(
                HttpRequest::builder()
                    .uri(&uri)
                    .header("Authorization", "Bearer intruder-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);

        // The owner still can.
        let res = router(ServerState { db })
            .oneshot(
                HttpRequest::builder()
                    .uri(&uri)
                    .header("Authorization", "Bearer owner-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["data"]["total"], 10_000);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let db = setup_test_db().await.unwrap();
        create_test_user(&db, TEST_USER, "good-token").await.unwrap();
        create_test_wallet_with_balance(&db, "Cash", 5_000)
            .await
            .unwrap();
        let app = router(ServerState { db });

        let res = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/wallets")
                    .header("Authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["name"], "Cash");
        assert_eq!(body["data"][0]["current_balance"], 5_000);
    }
}
