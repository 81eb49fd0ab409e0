//! Shared helpers for the test suite: an in-memory database with the full
//! schema, plus factories for the rows most tests need.

use crate::{
    config::database::create_tables,
    entities::{category, user, wallet},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection, Set, prelude::*};

/// User id most test fixtures are scoped to.
pub const TEST_USER: &str = "test-user";

/// Opens a fresh in-memory sqlite database with all tables created.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// A fixed, unremarkable date for transactions.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

/// Inserts a user row with a bearer token, for exercising the HTTP surface.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    token: &str,
) -> Result<user::Model> {
    user::ActiveModel {
        username: Set(username.to_string()),
        token: Set(token.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a wallet for [`TEST_USER`] with a zero starting balance.
pub async fn create_test_wallet(db: &DatabaseConnection, name: &str) -> Result<wallet::Model> {
    create_test_wallet_with_balance(db, name, 0).await
}

/// Inserts a wallet for [`TEST_USER`] with the given starting balance.
pub async fn create_test_wallet_with_balance(
    db: &DatabaseConnection,
    name: &str,
    initial_balance: i64,
) -> Result<wallet::Model> {
    wallet::ActiveModel {
        user_id: Set(TEST_USER.to_string()),
        name: Set(name.to_string()),
        icon: Set(String::new()),
        initial_balance: Set(initial_balance),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a regular category for [`TEST_USER`].
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
    budget: i64,
) -> Result<category::Model> {
    category::ActiveModel {
        user_id: Set(TEST_USER.to_string()),
        name: Set(name.to_string()),
        icon: Set(String::new()),
        is_essential: Set(false),
        is_debt_category: Set(false),
        budget: Set(budget),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
