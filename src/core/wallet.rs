//! Wallet business logic: CRUD, the deletion guard, and balance derivation.
//!
//! A wallet's displayed balance is never stored. The two balance queries
//! have deliberately different scopes:
//!
//! * [`current_balance`] - the live balance: `initial_balance` plus the OPEN
//!   period's net flow. Archived periods are excluded because the close
//!   reconciliation already folded them into `initial_balance`.
//! * [`net_worth`] - the all-time figure: the sum of every wallet's current
//!   balance. Correct for the same reason; summing archived transactions on
//!   top would double-count.

use crate::{
    core::period,
    entities::{Expense, Income, Wallet, expense, income, wallet},
    errors::{Error, ReferenceScope, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Pure balance derivation: `initial_balance` plus incomes minus expenses,
/// both restricted to `wallet_id`. The caller chooses the scope by choosing
/// which transactions to pass in. A wallet with no transactions keeps its
/// initial balance unchanged.
#[must_use]
pub fn derive_balance(
    initial_balance: i64,
    wallet_id: i64,
    incomes: &[income::Model],
    expenses: &[expense::Model],
) -> i64 {
    let added: i64 = incomes
        .iter()
        .filter(|i| i.wallet_id == wallet_id)
        .map(|i| i.amount)
        .sum();
    let spent: i64 = expenses
        .iter()
        .filter(|e| e.wallet_id == wallet_id)
        .map(|e| e.amount)
        .sum();
    initial_balance + added - spent
}

/// Retrieves all of a user's wallets, ordered alphabetically by name.
pub async fn list_wallets(db: &DatabaseConnection, user_id: &str) -> Result<Vec<wallet::Model>> {
    Wallet::find()
        .filter(wallet::Column::UserId.eq(user_id))
        .order_by_asc(wallet::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a wallet by its unique id.
pub async fn get_wallet_by_id(
    db: &DatabaseConnection,
    wallet_id: i64,
) -> Result<Option<wallet::Model>> {
    Wallet::find_by_id(wallet_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new wallet with the given opening balance.
pub async fn create_wallet(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    icon: String,
    initial_balance: i64,
) -> Result<wallet::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Wallet name cannot be empty".to_string(),
        });
    }

    let model = wallet::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.trim().to_string()),
        icon: Set(icon),
        initial_balance: Set(initial_balance),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Updates a wallet's name, icon, or stored balance. Editing
/// `initial_balance` here is the "direct user edit" path; everything else
/// goes through the period close.
pub async fn update_wallet(
    db: &DatabaseConnection,
    wallet_id: i64,
    name: Option<String>,
    icon: Option<String>,
    initial_balance: Option<i64>,
) -> Result<wallet::Model> {
    let existing = get_wallet_by_id(db, wallet_id)
        .await?
        .ok_or(Error::WalletNotFound { id: wallet_id })?;

    let mut active: wallet::ActiveModel = existing.into();
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Wallet name cannot be empty".to_string(),
            });
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(icon) = icon {
        active.icon = Set(icon);
    }
    if let Some(balance) = initial_balance {
        active.initial_balance = Set(balance);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a wallet, refusing while any transaction still references it.
///
/// Both scopes are scanned: the open period and every archive. The error
/// names which scope blocks the deletion, and the wallet is left untouched.
pub async fn delete_wallet(db: &DatabaseConnection, wallet_id: i64) -> Result<()> {
    let existing = get_wallet_by_id(db, wallet_id)
        .await?
        .ok_or(Error::WalletNotFound { id: wallet_id })?;

    let open_period_id = period::current_period(db, &existing.user_id)
        .await?
        .map(|p| p.id);

    let expenses = Expense::find()
        .filter(expense::Column::WalletId.eq(wallet_id))
        .all(db)
        .await?;
    let incomes = Income::find()
        .filter(income::Column::WalletId.eq(wallet_id))
        .all(db)
        .await?;

    let in_current = expenses.iter().any(|e| Some(e.period_id) == open_period_id)
        || incomes.iter().any(|i| Some(i.period_id) == open_period_id);
    let in_archive = expenses.iter().any(|e| Some(e.period_id) != open_period_id)
        || incomes.iter().any(|i| Some(i.period_id) != open_period_id);

    if in_current {
        return Err(Error::WalletInUse {
            name: existing.name,
            scope: ReferenceScope::CurrentPeriod,
        });
    }
    if in_archive {
        return Err(Error::WalletInUse {
            name: existing.name,
            scope: ReferenceScope::Archive,
        });
    }

    Wallet::delete_by_id(wallet_id).exec(db).await?;
    Ok(())
}

/// The wallet's live balance: `initial_balance` plus the open period's net
/// flow. With no open period the stored balance is already live.
pub async fn current_balance(db: &DatabaseConnection, wallet: &wallet::Model) -> Result<i64> {
    let Some(open) = period::current_period(db, &wallet.user_id).await? else {
        return Ok(wallet.initial_balance);
    };

    let expenses = period::period_expenses(db, open.id).await?;
    let incomes = period::period_incomes(db, open.id).await?;

    Ok(derive_balance(
        wallet.initial_balance,
        wallet.id,
        &incomes,
        &expenses,
    ))
}

/// The user's net worth: every wallet's current balance summed. Archived
/// periods are covered through the balances folded in at close time.
pub async fn net_worth(db: &DatabaseConnection, user_id: &str) -> Result<i64> {
    let wallets = list_wallets(db, user_id).await?;

    let Some(open) = period::current_period(db, user_id).await? else {
        return Ok(wallets.iter().map(|w| w.initial_balance).sum());
    };

    let expenses = period::period_expenses(db, open.id).await?;
    let incomes = period::period_incomes(db, open.id).await?;

    Ok(wallets
        .iter()
        .map(|w| derive_balance(w.initial_balance, w.id, &incomes, &expenses))
        .sum())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{expense as expense_ops, income as income_ops, period as period_ops};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_derive_balance_no_transactions() {
        assert_eq!(derive_balance(50_000, 1, &[], &[]), 50_000);
    }

    #[tokio::test]
    async fn test_derive_balance_scopes_by_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        let mine = create_test_wallet_with_balance(&db, "Mine", 10_000).await?;
        let other = create_test_wallet(&db, "Other").await?;
        let cat = create_test_category(&db, "Umum", 0).await?;
        let open = period_ops::ensure_current_period(&db, TEST_USER).await?;

        record_expense_for(&db, mine.id, cat.id, 4_000).await?;
        record_expense_for(&db, other.id, cat.id, 9_999).await?;
        record_income_for(&db, mine.id, 2_500).await?;

        let expenses = period_ops::period_expenses(&db, open.id).await?;
        let incomes = period_ops::period_incomes(&db, open.id).await?;

        assert_eq!(
            derive_balance(mine.initial_balance, mine.id, &incomes, &expenses),
            10_000 + 2_500 - 4_000
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_wallet_rejects_blank_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_wallet(&db, TEST_USER, "  ".to_string(), String::new(), 0).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_wallet_direct_balance_edit() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet_with_balance(&db, "Cash", 5_000).await?;

        let updated = update_wallet(&db, wallet.id, None, None, Some(99_000)).await?;
        assert_eq!(updated.initial_balance, 99_000);
        assert_eq!(updated.name, "Cash");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_wallet() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_wallet(&db, 42, Some("x".to_string()), None, None).await;
        assert!(matches!(result.unwrap_err(), Error::WalletNotFound { id: 42 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unreferenced_wallet_succeeds() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Empty").await?;

        delete_wallet(&db, wallet.id).await?;
        assert!(get_wallet_by_id(&db, wallet.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_wallet_blocked_by_current_period() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Busy").await?;
        let cat = create_test_category(&db, "Umum", 0).await?;
        period_ops::ensure_current_period(&db, TEST_USER).await?;
        record_expense_for(&db, wallet.id, cat.id, 1_000).await?;

        let result = delete_wallet(&db, wallet.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletInUse {
                scope: crate::errors::ReferenceScope::CurrentPeriod,
                ..
            }
        ));

        // The wallet must still exist after the refusal.
        assert!(get_wallet_by_id(&db, wallet.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_wallet_blocked_by_archive() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "History").await?;
        period_ops::ensure_current_period(&db, TEST_USER).await?;
        record_income_for(&db, wallet.id, 1_000).await?;
        period_ops::close_period(&db, TEST_USER).await?;

        let result = delete_wallet(&db, wallet.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletInUse {
                scope: crate::errors::ReferenceScope::Archive,
                ..
            }
        ));
        assert!(get_wallet_by_id(&db, wallet.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_current_balance_uses_open_period_only() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet_with_balance(&db, "Bank", 100_000).await?;
        let cat = create_test_category(&db, "Umum", 0).await?;
        period_ops::ensure_current_period(&db, TEST_USER).await?;

        // First period: net -20000, folded into the stored balance at close.
        record_expense_for(&db, wallet.id, cat.id, 20_000).await?;
        period_ops::close_period(&db, TEST_USER).await?;

        // Second period: net +7000, still live.
        record_income_for(&db, wallet.id, 7_000).await?;

        let wallet = get_wallet_by_id(&db, wallet.id).await?.unwrap();
        assert_eq!(wallet.initial_balance, 80_000);
        assert_eq!(current_balance(&db, &wallet).await?, 87_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_net_worth_sums_wallets_without_double_counting() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_wallet_with_balance(&db, "A", 30_000).await?;
        let b = create_test_wallet_with_balance(&db, "B", 20_000).await?;
        let cat = create_test_category(&db, "Umum", 0).await?;
        period_ops::ensure_current_period(&db, TEST_USER).await?;

        record_expense_for(&db, a.id, cat.id, 10_000).await?;
        period_ops::close_period(&db, TEST_USER).await?;
        record_income_for(&db, b.id, 5_000).await?;

        // 30000 - 10000 + 20000 + 5000, with the archived expense counted
        // exactly once (through wallet A's folded balance).
        assert_eq!(net_worth(&db, TEST_USER).await?, 45_000);

        Ok(())
    }

    async fn record_expense_for(
        db: &DatabaseConnection,
        wallet_id: i64,
        category_id: i64,
        base_amount: i64,
    ) -> Result<expense::Model> {
        expense_ops::record_expense(
            db,
            TEST_USER,
            expense_ops::NewExpense {
                wallet_id,
                date: test_date(),
                notes: String::new(),
                base_amount,
                admin_fee: 0,
                assignment: expense_ops::CategoryAssignment::Single { category_id },
                saving_goal_id: None,
                debt_id: None,
            },
        )
        .await
    }

    async fn record_income_for(
        db: &DatabaseConnection,
        wallet_id: i64,
        base_amount: i64,
    ) -> Result<income::Model> {
        income_ops::record_income(
            db,
            TEST_USER,
            income_ops::NewIncome {
                wallet_id,
                date: test_date(),
                notes: String::new(),
                base_amount,
                admin_fee: 0,
            },
        )
        .await
    }
}
