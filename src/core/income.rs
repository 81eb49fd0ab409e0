//! Income business logic.
//!
//! Fee semantics mirror expenses in the other direction: the admin fee
//! reduces what is actually received, `amount = base_amount - admin_fee`.

use crate::{
    core::period,
    entities::{Income, income},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Input for recording or replacing an income.
#[derive(Debug, Clone)]
pub struct NewIncome {
    pub wallet_id: i64,
    pub date: Date,
    pub notes: String,
    /// Amount before the admin fee, in minor units
    pub base_amount: i64,
    /// Admin fee in minor units; may not exceed `base_amount`
    pub admin_fee: i64,
}

fn validate(new: &NewIncome) -> Result<i64> {
    if new.base_amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: new.base_amount,
        });
    }
    if new.admin_fee < 0 || new.admin_fee > new.base_amount {
        return Err(Error::InvalidAmount {
            amount: new.admin_fee,
        });
    }
    Ok(new.base_amount - new.admin_fee)
}

/// Records an income in the user's open period, bootstrapping the period on
/// first use.
pub async fn record_income(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewIncome,
) -> Result<income::Model> {
    let amount = validate(&new)?;
    let open = period::ensure_current_period(db, user_id).await?;

    income::ActiveModel {
        period_id: Set(open.id),
        wallet_id: Set(new.wallet_id),
        amount: Set(amount),
        base_amount: Set(new.base_amount),
        admin_fee: Set(new.admin_fee),
        date: Set(new.date),
        notes: Set(new.notes),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds an income by its unique id.
pub async fn get_income_by_id(
    db: &DatabaseConnection,
    income_id: i64,
) -> Result<Option<income::Model>> {
    Income::find_by_id(income_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces an income by id. The row keeps its period; a missing id is
/// [`Error::TransactionNotFound`], never an implicit insert.
pub async fn update_income(
    db: &DatabaseConnection,
    income_id: i64,
    new: NewIncome,
) -> Result<income::Model> {
    let amount = validate(&new)?;

    let existing = get_income_by_id(db, income_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: income_id })?;

    let mut active: income::ActiveModel = existing.into();
    active.wallet_id = Set(new.wallet_id);
    active.amount = Set(amount);
    active.base_amount = Set(new.base_amount);
    active.admin_fee = Set(new.admin_fee);
    active.date = Set(new.date);
    active.notes = Set(new.notes);

    active.update(db).await.map_err(Into::into)
}

/// Deletes an income by id.
pub async fn delete_income(db: &DatabaseConnection, income_id: i64) -> Result<()> {
    let existing = get_income_by_id(db, income_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: income_id })?;

    existing.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn income_of(wallet_id: i64, base_amount: i64, admin_fee: i64) -> NewIncome {
        NewIncome {
            wallet_id,
            date: test_date(),
            notes: "gaji".to_string(),
            base_amount,
            admin_fee,
        }
    }

    #[tokio::test]
    async fn test_fee_reduces_received_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let recorded = record_income(&db, TEST_USER, income_of(wallet.id, 100_000, 6_500)).await?;
        assert_eq!(recorded.amount, 93_500);
        assert_eq!(recorded.base_amount, 100_000);
        assert_eq!(recorded.admin_fee, 6_500);

        Ok(())
    }

    #[tokio::test]
    async fn test_fee_may_not_exceed_base() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let result = record_income(&db, TEST_USER, income_of(wallet.id, 1_000, 1_001)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 1_001 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_base_amount_must_be_positive() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let result = record_income(&db, TEST_USER, income_of(wallet.id, 0, 0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_of_missing_income_is_hard_error() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let result = update_income(&db, 77, income_of(wallet.id, 5_000, 0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 77 }
        ));
        assert!(get_income_by_id(&db, 77).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_recomputes_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let recorded = record_income(&db, TEST_USER, income_of(wallet.id, 10_000, 0)).await?;
        let updated = update_income(&db, recorded.id, income_of(wallet.id, 20_000, 500)).await?;
        assert_eq!(updated.amount, 19_500);
        assert_eq!(updated.period_id, recorded.period_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_income() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        let recorded = record_income(&db, TEST_USER, income_of(wallet.id, 10_000, 0)).await?;
        delete_income(&db, recorded.id).await?;
        assert!(get_income_by_id(&db, recorded.id).await?.is_none());

        let again = delete_income(&db, recorded.id).await;
        assert!(matches!(
            again.unwrap_err(),
            Error::TransactionNotFound { .. }
        ));

        Ok(())
    }
}
