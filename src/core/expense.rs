//! Expense business logic.
//!
//! Fee semantics: the admin fee increases the outflow, so
//! `amount = base_amount + admin_fee`. A split expense divides that amount
//! over several categories; the shares must sum to it exactly.
//!
//! Category, goal, and debt references are deliberately NOT validated here -
//! dangling ids are tolerated and resolved to display defaults by readers.
//! Editing a transaction that does not exist is a hard error, never an
//! implicit insert.

use crate::{
    core::period,
    entities::{Expense, ExpenseSplit, expense, expense_split},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// One category's share of a split expense.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitShare {
    /// Category receiving this share
    pub category_id: i64,
    /// Share amount in minor units
    pub amount: i64,
}

/// How an expense is assigned to categories.
#[derive(Debug, Clone)]
pub enum CategoryAssignment {
    /// The whole amount goes to one category
    Single { category_id: i64 },
    /// The amount is divided over several categories
    Split { splits: Vec<SplitShare> },
}

/// Input for recording or replacing an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub wallet_id: i64,
    pub date: Date,
    pub notes: String,
    /// Amount before the admin fee, in minor units
    pub base_amount: i64,
    /// Admin fee in minor units, zero when none
    pub admin_fee: i64,
    pub assignment: CategoryAssignment,
    pub saving_goal_id: Option<i64>,
    pub debt_id: Option<i64>,
}

fn validate(new: &NewExpense) -> Result<i64> {
    if new.base_amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: new.base_amount,
        });
    }
    if new.admin_fee < 0 {
        return Err(Error::InvalidAmount {
            amount: new.admin_fee,
        });
    }

    let amount = new.base_amount + new.admin_fee;

    if let CategoryAssignment::Split { splits } = &new.assignment {
        if splits.is_empty() {
            return Err(Error::Validation {
                message: "A split expense needs at least one share".to_string(),
            });
        }
        for share in splits {
            if share.amount <= 0 {
                return Err(Error::InvalidAmount {
                    amount: share.amount,
                });
            }
        }
        let split_total: i64 = splits.iter().map(|s| s.amount).sum();
        if split_total != amount {
            return Err(Error::SplitMismatch {
                expected: amount,
                actual: split_total,
            });
        }
    }

    Ok(amount)
}

/// Records an expense in the user's open period, bootstrapping the period on
/// first use. The expense row and its split rows are written atomically.
pub async fn record_expense(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewExpense,
) -> Result<expense::Model> {
    let amount = validate(&new)?;
    let open = period::ensure_current_period(db, user_id).await?;

    let txn = db.begin().await?;

    let (category_id, is_split) = match &new.assignment {
        CategoryAssignment::Single { category_id } => (Some(*category_id), false),
        CategoryAssignment::Split { .. } => (None, true),
    };

    let inserted = expense::ActiveModel {
        period_id: Set(open.id),
        wallet_id: Set(new.wallet_id),
        category_id: Set(category_id),
        is_split: Set(is_split),
        amount: Set(amount),
        base_amount: Set(new.base_amount),
        admin_fee: Set(new.admin_fee),
        date: Set(new.date),
        notes: Set(new.notes.clone()),
        saving_goal_id: Set(new.saving_goal_id),
        debt_id: Set(new.debt_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let CategoryAssignment::Split { splits } = &new.assignment {
        for share in splits {
            expense_split::ActiveModel {
                expense_id: Set(inserted.id),
                category_id: Set(share.category_id),
                amount: Set(share.amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(inserted)
}

/// Finds an expense by its unique id.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Split shares of an expense; empty for a non-split expense.
pub async fn get_expense_splits(
    db: &DatabaseConnection,
    expense_id: i64,
) -> Result<Vec<expense_split::Model>> {
    ExpenseSplit::find()
        .filter(expense_split::Column::ExpenseId.eq(expense_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces an expense by id. The row keeps its period, so edits can target
/// archived history; a missing id is [`Error::TransactionNotFound`]. Split
/// rows are replaced wholesale in the same transaction.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    new: NewExpense,
) -> Result<expense::Model> {
    let amount = validate(&new)?;

    let existing = get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: expense_id })?;

    let txn = db.begin().await?;

    ExpenseSplit::delete_many()
        .filter(expense_split::Column::ExpenseId.eq(expense_id))
        .exec(&txn)
        .await?;

    let (category_id, is_split) = match &new.assignment {
        CategoryAssignment::Single { category_id } => (Some(*category_id), false),
        CategoryAssignment::Split { .. } => (None, true),
    };

    let mut active: expense::ActiveModel = existing.into();
    active.wallet_id = Set(new.wallet_id);
    active.category_id = Set(category_id);
    active.is_split = Set(is_split);
    active.amount = Set(amount);
    active.base_amount = Set(new.base_amount);
    active.admin_fee = Set(new.admin_fee);
    active.date = Set(new.date);
    active.notes = Set(new.notes.clone());
    active.saving_goal_id = Set(new.saving_goal_id);
    active.debt_id = Set(new.debt_id);
    let updated = active.update(&txn).await?;

    if let CategoryAssignment::Split { splits } = &new.assignment {
        for share in splits {
            expense_split::ActiveModel {
                expense_id: Set(expense_id),
                category_id: Set(share.category_id),
                amount: Set(share.amount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(updated)
}

/// Deletes an expense and its split rows atomically.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let existing = get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: expense_id })?;

    let txn = db.begin().await?;

    ExpenseSplit::delete_many()
        .filter(expense_split::Column::ExpenseId.eq(expense_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}
