//! Reporting over periods: per-category spending, goal and debt progress.
//!
//! Transactions may reference categories, wallets, goals, or debts that no
//! longer exist. Every lookup here resolves through an explicit default
//! instead of failing, per the resolve-or-default display contract.

use crate::{
    core::period,
    entities::{
        Debt, Expense, ExpenseSplit, SavingGoal, category, debt, expense, expense_split,
        saving_goal, wallet,
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Display name for a missing or absent category reference.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Display name for a missing wallet reference.
pub const NO_WALLET: &str = "No wallet";

/// Resolves a category reference to a display name.
#[must_use]
pub fn resolve_category_name(categories: &[category::Model], id: Option<i64>) -> String {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map_or_else(|| UNCATEGORIZED.to_string(), |c| c.name.clone())
}

/// Resolves a wallet reference to a display name.
#[must_use]
pub fn resolve_wallet_name(wallets: &[wallet::Model], id: i64) -> String {
    wallets
        .iter()
        .find(|w| w.id == id)
        .map_or_else(|| NO_WALLET.to_string(), |w| w.name.clone())
}

/// One category's line in a period summary.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    /// Category id; None for the uncategorized bucket
    pub category_id: Option<i64>,
    /// Resolved display name
    pub name: String,
    /// Budget from the period's snapshot, zero when none was set
    pub budget: i64,
    /// Amount spent against the category in this period
    pub spent: i64,
    /// `budget - spent`
    pub remaining: i64,
}

/// Spending summary of the user's open period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period_id: i64,
    /// Sum of the period's category budgets
    pub base_budget: i64,
    /// Sum of the period's income amounts
    pub added_income: i64,
    /// Sum of the period's expense amounts
    pub total_expenses: i64,
    /// Per-category lines, budgeted categories first
    pub categories: Vec<CategorySpend>,
}

/// Builds the spending summary for the open period. Split expenses
/// contribute each share to its own category; expenses whose category no
/// longer exists land in the uncategorized line.
pub async fn period_summary(db: &DatabaseConnection, user_id: &str) -> Result<PeriodSummary> {
    let open = period::current_period(db, user_id)
        .await?
        .ok_or(Error::PeriodNotFound)?;

    let budgets = period::period_budgets(db, open.id).await?;
    let expenses = period::period_expenses(db, open.id).await?;
    let incomes = period::period_incomes(db, open.id).await?;
    let categories = crate::core::category::list_categories(db, user_id).await?;

    let expense_ids: Vec<i64> = expenses.iter().filter(|e| e.is_split).map(|e| e.id).collect();
    let splits: Vec<expense_split::Model> = if expense_ids.is_empty() {
        Vec::new()
    } else {
        ExpenseSplit::find()
            .filter(expense_split::Column::ExpenseId.is_in(expense_ids))
            .all(db)
            .await?
    };

    // spent per category id; the None key is the uncategorized bucket
    let mut spent: HashMap<Option<i64>, i64> = HashMap::new();
    for e in &expenses {
        if e.is_split {
            continue;
        }
        let key = e
            .category_id
            .filter(|id| categories.iter().any(|c| c.id == *id));
        *spent.entry(key).or_insert(0) += e.amount;
    }
    for share in &splits {
        let key = Some(share.category_id).filter(|id| categories.iter().any(|c| c.id == *id));
        *spent.entry(key).or_insert(0) += share.amount;
    }

    let mut lines = Vec::new();
    for b in &budgets {
        let used = spent.remove(&Some(b.category_id)).unwrap_or(0);
        lines.push(CategorySpend {
            category_id: Some(b.category_id),
            name: resolve_category_name(&categories, Some(b.category_id)),
            budget: b.budget,
            spent: used,
            remaining: b.budget - used,
        });
    }
    // Spending outside the budget snapshot, including the dangling bucket.
    for (key, used) in spent {
        lines.push(CategorySpend {
            category_id: key,
            name: resolve_category_name(&categories, key),
            budget: 0,
            spent: used,
            remaining: -used,
        });
    }

    Ok(PeriodSummary {
        period_id: open.id,
        base_budget: budgets.iter().map(|b| b.budget).sum(),
        added_income: incomes.iter().map(|i| i.amount).sum(),
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        categories: lines,
    })
}

/// Ids of every period the user owns, open and archived.
async fn user_period_ids(db: &DatabaseConnection, user_id: &str) -> Result<Vec<i64>> {
    let periods = crate::entities::Period::find()
        .filter(crate::entities::period::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(periods.into_iter().map(|p| p.id).collect())
}

/// Total saved toward one of the caller's goals: every expense tagged with
/// it, across the open period and all archives. The goal must exist and
/// belong to the caller; the sum only covers the caller's own periods.
pub async fn saving_goal_progress(
    db: &DatabaseConnection,
    user_id: &str,
    goal_id: i64,
) -> Result<i64> {
    SavingGoal::find_by_id(goal_id)
        .one(db)
        .await?
        .filter(|g| g.user_id == user_id)
        .ok_or(Error::SavingGoalNotFound { id: goal_id })?;

    let tagged = Expense::find()
        .filter(expense::Column::SavingGoalId.eq(goal_id))
        .filter(expense::Column::PeriodId.is_in(user_period_ids(db, user_id).await?))
        .all(db)
        .await?;
    Ok(tagged.iter().map(|e| e.amount).sum())
}

/// Total paid toward one of the caller's debts: every expense tagged with
/// it, across the open period and all archives. Same ownership rules as
/// [`saving_goal_progress`].
pub async fn debt_paid_total(db: &DatabaseConnection, user_id: &str, debt_id: i64) -> Result<i64> {
    Debt::find_by_id(debt_id)
        .one(db)
        .await?
        .filter(|d| d.user_id == user_id)
        .ok_or(Error::DebtNotFound { id: debt_id })?;

    let tagged = Expense::find()
        .filter(expense::Column::DebtId.eq(debt_id))
        .filter(expense::Column::PeriodId.is_in(user_period_ids(db, user_id).await?))
        .all(db)
        .await?;
    Ok(tagged.iter().map(|e| e.amount).sum())
}

/// Retrieves all of a user's saving goals, ordered by name.
pub async fn list_saving_goals(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<saving_goal::Model>> {
    SavingGoal::find()
        .filter(saving_goal::Column::UserId.eq(user_id))
        .order_by_asc(saving_goal::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a saving goal.
pub async fn create_saving_goal(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    icon: String,
    target_amount: i64,
) -> Result<saving_goal::Model> {
    if target_amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: target_amount,
        });
    }

    saving_goal::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name),
        icon: Set(icon),
        target_amount: Set(target_amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves all of a user's debts, ordered by name.
pub async fn list_debts(db: &DatabaseConnection, user_id: &str) -> Result<Vec<debt::Model>> {
    Debt::find()
        .filter(debt::Column::UserId.eq(user_id))
        .order_by_asc(debt::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a tracked debt.
pub async fn create_debt(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    total_amount: i64,
) -> Result<debt::Model> {
    if total_amount <= 0 {
        return Err(Error::InvalidAmount {
            amount: total_amount,
        });
    }

    debt::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name),
        total_amount: Set(total_amount),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
