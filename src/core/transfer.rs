//! Wallet-to-wallet fund transfers.
//!
//! A transfer is a matched pair in the open period: one expense on the
//! source wallet (the transferred amount plus any admin fee, categorized
//! under the reserved transfer category) and one income on the destination
//! (the transferred amount, no fee), identically dated. Both rows are
//! written in one transaction - after any failure neither exists.

use crate::{
    core::{category, period, wallet},
    entities::{expense, income},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::info;

/// The two rows created by a successful transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Outflow recorded on the source wallet (`amount + admin_fee`)
    pub expense: expense::Model,
    /// Inflow recorded on the destination wallet (`amount`)
    pub income: income::Model,
}

/// Moves funds between two wallets.
///
/// All validation happens before any write: positive amount, non-negative
/// fee, distinct wallets, and both wallets present and owned by the caller.
#[allow(clippy::too_many_arguments)]
pub async fn transfer_funds(
    db: &DatabaseConnection,
    user_id: &str,
    from_wallet_id: i64,
    to_wallet_id: i64,
    amount: i64,
    admin_fee: i64,
    date: Date,
    notes: String,
) -> Result<TransferReceipt> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    if admin_fee < 0 {
        return Err(Error::InvalidAmount { amount: admin_fee });
    }
    if from_wallet_id == to_wallet_id {
        return Err(Error::SameWalletTransfer);
    }

    let from = wallet::get_wallet_by_id(db, from_wallet_id)
        .await?
        .filter(|w| w.user_id == user_id)
        .ok_or(Error::WalletNotFound { id: from_wallet_id })?;
    let to = wallet::get_wallet_by_id(db, to_wallet_id)
        .await?
        .filter(|w| w.user_id == user_id)
        .ok_or(Error::WalletNotFound { id: to_wallet_id })?;

    let open = period::ensure_current_period(db, user_id).await?;

    let txn = db.begin().await?;

    let transfer_category = category::ensure_transfer_category(&txn, user_id).await?;

    let out = expense::ActiveModel {
        period_id: Set(open.id),
        wallet_id: Set(from.id),
        category_id: Set(Some(transfer_category.id)),
        is_split: Set(false),
        amount: Set(amount + admin_fee),
        base_amount: Set(amount),
        admin_fee: Set(admin_fee),
        date: Set(date),
        notes: Set(notes.clone()),
        saving_goal_id: Set(None),
        debt_id: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let incoming = income::ActiveModel {
        period_id: Set(open.id),
        wallet_id: Set(to.id),
        amount: Set(amount),
        base_amount: Set(amount),
        admin_fee: Set(0),
        date: Set(date),
        notes: Set(notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        user = user_id,
        from = from.id,
        to = to.id,
        amount,
        "transferred funds between wallets"
    );

    Ok(TransferReceipt {
        expense: out,
        income: incoming,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::period as period_ops;
    use crate::entities::{Expense, Income};
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_transfer_creates_matched_pair() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_wallet(&db, "A").await?;
        let b = create_test_wallet(&db, "B").await?;

        let receipt = transfer_funds(
            &db,
            TEST_USER,
            a.id,
            b.id,
            10_000,
            500,
            test_date(),
            "topup".to_string(),
        )
        .await?;

        assert_eq!(receipt.expense.wallet_id, a.id);
        assert_eq!(receipt.expense.amount, 10_500);
        assert_eq!(receipt.income.wallet_id, b.id);
        assert_eq!(receipt.income.amount, 10_000);
        assert_eq!(receipt.expense.date, receipt.income.date);

        // The outflow is categorized under the reserved transfer category.
        let transfer_cat = category::ensure_transfer_category(&db, TEST_USER).await?;
        assert_eq!(receipt.expense.category_id, Some(transfer_cat.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_failure_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_wallet(&db, "A").await?;

        // Destination wallet does not exist.
        let result = transfer_funds(
            &db,
            TEST_USER,
            a.id,
            999,
            10_000,
            500,
            test_date(),
            String::new(),
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::WalletNotFound { id: 999 }
        ));

        assert_eq!(Expense::find().count(&db).await?, 0);
        assert_eq!(Income::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_to_same_wallet_is_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_wallet(&db, "A").await?;

        let result =
            transfer_funds(&db, TEST_USER, a.id, a.id, 1_000, 0, test_date(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::SameWalletTransfer));

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_nets_out_in_balances() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_wallet_with_balance(&db, "A", 50_000).await?;
        let b = create_test_wallet_with_balance(&db, "B", 0).await?;

        transfer_funds(
            &db,
            TEST_USER,
            a.id,
            b.id,
            10_000,
            500,
            test_date(),
            String::new(),
        )
        .await?;
        period_ops::close_period(&db, TEST_USER).await?;

        let a = crate::entities::Wallet::find_by_id(a.id).one(&db).await?.unwrap();
        let b = crate::entities::Wallet::find_by_id(b.id).one(&db).await?.unwrap();
        assert_eq!(a.initial_balance, 39_500);
        assert_eq!(b.initial_balance, 10_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_transfer_rejects_other_users_wallet() -> Result<()> {
        let db = setup_test_db().await?;
        let mine = create_test_wallet(&db, "Mine").await?;
        let theirs = crate::core::wallet::create_wallet(
            &db,
            "someone-else",
            "Theirs".to_string(),
            String::new(),
            0,
        )
        .await?;

        let result = transfer_funds(
            &db,
            TEST_USER,
            mine.id,
            theirs.id,
            1_000,
            0,
            test_date(),
            String::new(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::WalletNotFound { .. }));

        Ok(())
    }
}
