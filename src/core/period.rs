//! Budget period lifecycle and the period-close reconciliation.
//!
//! Exactly one period per user is open at a time. The open period
//! accumulates expenses and incomes; closing it is the one operation in the
//! system with real multi-row invariants:
//!
//! 1. every wallet's `initial_balance` absorbs the closed period's net flow
//!    for that wallet,
//! 2. the closed period is frozen with its summary totals (its transactions
//!    stay attached to it, forming the archive),
//! 3. a successor period opens with the same category budgets and no
//!    transactions.
//!
//! All three happen in one database transaction or not at all; a partial
//! write would silently corrupt the derived-balance invariant.

use crate::{
    entities::{Category, CategoryBudget, Expense, Income, Period, Wallet, category,
        category_budget, expense, income, period, wallet},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::info;

/// Per-wallet figures from a period close.
#[derive(Debug, Clone, Serialize)]
pub struct WalletCloseEntry {
    /// Name of the wallet
    pub wallet_name: String,
    /// `initial_balance` before the close
    pub opening_balance: i64,
    /// Sum of the closed period's incomes into this wallet
    pub income_total: i64,
    /// Sum of the closed period's expenses out of this wallet
    pub expense_total: i64,
    /// `initial_balance` after the close
    pub closing_balance: i64,
}

/// Result of closing a period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodCloseReport {
    /// Id of the period that was frozen
    pub closed_period_id: i64,
    /// Id of the freshly opened successor period
    pub new_period_id: i64,
    /// When the close happened
    pub closed_at: DateTimeUtc,
    /// Frozen total: base budget plus added incomes
    pub total_income: i64,
    /// Frozen total: sum of expense amounts
    pub total_expenses: i64,
    /// Frozen total: `total_income - total_expenses`
    pub remaining_budget: i64,
    /// Per-wallet reconciliation figures
    pub wallets: Vec<WalletCloseEntry>,
    /// Number of category budgets carried into the new period
    pub carried_budgets: usize,
}

/// Finds the user's open period, if any.
pub async fn current_period<C>(db: &C, user_id: &str) -> Result<Option<period::Model>>
where
    C: ConnectionTrait,
{
    Period::find()
        .filter(period::Column::UserId.eq(user_id))
        .filter(period::Column::PeriodEnd.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the open period, creating one when the user has none yet.
///
/// A fresh period snapshots the budget of every master category into
/// `category_budgets`, so the period carries the budgets in force at the
/// moment it opened.
pub async fn ensure_current_period(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<period::Model> {
    if let Some(open) = current_period(db, user_id).await? {
        return Ok(open);
    }

    let txn = db.begin().await?;

    let categories = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .all(&txn)
        .await?;

    let opened = period::ActiveModel {
        user_id: Set(user_id.to_string()),
        period_start: Set(Utc::now()),
        period_end: Set(None),
        total_income: Set(None),
        total_expenses: Set(None),
        remaining_budget: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for cat in &categories {
        category_budget::ActiveModel {
            period_id: Set(opened.id),
            category_id: Set(cat.id),
            budget: Set(cat.budget),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(user = user_id, period = opened.id, "opened first budget period");
    Ok(opened)
}

/// Lists the user's closed periods, newest first.
pub async fn archived_periods(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<period::Model>> {
    Period::find()
        .filter(period::Column::UserId.eq(user_id))
        .filter(period::Column::PeriodEnd.is_not_null())
        .order_by_desc(period::Column::PeriodStart)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Category budget snapshot rows of a period.
pub async fn period_budgets<C>(db: &C, period_id: i64) -> Result<Vec<category_budget::Model>>
where
    C: ConnectionTrait,
{
    CategoryBudget::find()
        .filter(category_budget::Column::PeriodId.eq(period_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Expenses of a period, newest date first.
pub async fn period_expenses<C>(db: &C, period_id: i64) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::PeriodId.eq(period_id))
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Incomes of a period, newest date first.
pub async fn period_incomes<C>(db: &C, period_id: i64) -> Result<Vec<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find()
        .filter(income::Column::PeriodId.eq(period_id))
        .order_by_desc(income::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets a category's budget in the open period and mirrors it to the master
/// category row, so the next period inherits it too.
pub async fn set_category_budget(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i64,
    budget: i64,
) -> Result<category_budget::Model> {
    if budget < 0 {
        return Err(Error::InvalidAmount { amount: budget });
    }

    let category = Category::find_by_id(category_id)
        .one(db)
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    let open = ensure_current_period(db, user_id).await?;

    let txn = db.begin().await?;

    let existing = CategoryBudget::find()
        .filter(category_budget::Column::PeriodId.eq(open.id))
        .filter(category_budget::Column::CategoryId.eq(category_id))
        .one(&txn)
        .await?;

    let snapshot = if let Some(row) = existing {
        let mut active: category_budget::ActiveModel = row.into();
        active.budget = Set(budget);
        active.update(&txn).await?
    } else {
        category_budget::ActiveModel {
            period_id: Set(open.id),
            category_id: Set(category_id),
            budget: Set(budget),
            ..Default::default()
        }
        .insert(&txn)
        .await?
    };

    let mut master: category::ActiveModel = category.into();
    master.budget = Set(budget);
    master.update(&txn).await?;

    txn.commit().await?;
    Ok(snapshot)
}

/// Closes the user's open period: reconciles wallet balances, freezes the
/// period with its summary totals, and opens a successor that inherits the
/// category budgets with empty transaction lists.
///
/// Fails fast with [`Error::PeriodNotFound`] before any write when no period
/// is open. All writes happen in one transaction; on conflict nothing is
/// applied.
pub async fn close_period(db: &DatabaseConnection, user_id: &str) -> Result<PeriodCloseReport> {
    let current = current_period(db, user_id)
        .await?
        .ok_or(Error::PeriodNotFound)?;

    let txn = db.begin().await?;
    let now = Utc::now();

    let wallets = Wallet::find()
        .filter(wallet::Column::UserId.eq(user_id))
        .order_by_asc(wallet::Column::Name)
        .all(&txn)
        .await?;
    let expenses = period_expenses(&txn, current.id).await?;
    let incomes = period_incomes(&txn, current.id).await?;
    let budgets = period_budgets(&txn, current.id).await?;

    // Fold each wallet's net flow for this period into its stored balance.
    let mut wallet_entries = Vec::with_capacity(wallets.len());
    for w in wallets {
        let income_total: i64 = incomes
            .iter()
            .filter(|i| i.wallet_id == w.id)
            .map(|i| i.amount)
            .sum();
        let expense_total: i64 = expenses
            .iter()
            .filter(|e| e.wallet_id == w.id)
            .map(|e| e.amount)
            .sum();
        let opening_balance = w.initial_balance;
        let closing_balance = opening_balance + income_total - expense_total;

        let wallet_name = w.name.clone();
        let mut active: wallet::ActiveModel = w.into();
        active.initial_balance = Set(closing_balance);
        active.update(&txn).await?;

        wallet_entries.push(WalletCloseEntry {
            wallet_name,
            opening_balance,
            income_total,
            expense_total,
            closing_balance,
        });
    }

    // Period-level summary, frozen onto the archive row.
    let total_expenses: i64 = expenses.iter().map(|e| e.amount).sum();
    let added_income: i64 = incomes.iter().map(|i| i.amount).sum();
    let base_budget: i64 = budgets.iter().map(|b| b.budget).sum();
    let total_income = base_budget + added_income;
    let remaining_budget = total_income - total_expenses;

    let closed_period_id = current.id;
    let mut closing: period::ActiveModel = current.into();
    closing.period_end = Set(Some(now));
    closing.total_income = Set(Some(total_income));
    closing.total_expenses = Set(Some(total_expenses));
    closing.remaining_budget = Set(Some(remaining_budget));
    closing.update(&txn).await?;

    // Successor period: inherited budgets, no transactions.
    let next = period::ActiveModel {
        user_id: Set(user_id.to_string()),
        period_start: Set(now),
        period_end: Set(None),
        total_income: Set(None),
        total_expenses: Set(None),
        remaining_budget: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for b in &budgets {
        category_budget::ActiveModel {
            period_id: Set(next.id),
            category_id: Set(b.category_id),
            budget: Set(b.budget),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        user = user_id,
        closed = closed_period_id,
        opened = next.id,
        "closed budget period"
    );

    Ok(PeriodCloseReport {
        closed_period_id,
        new_period_id: next.id,
        closed_at: now,
        total_income,
        total_expenses,
        remaining_budget,
        wallets: wallet_entries,
        carried_budgets: budgets.len(),
    })
}

/// Formats a close report into a human-readable summary string.
#[must_use]
pub fn format_close_summary(report: &PeriodCloseReport) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Period Closed - {} - income Rp{}, expenses Rp{}, remaining Rp{}\n",
        report.closed_at.format("%Y-%m-%d"),
        report.total_income,
        report.total_expenses,
        report.remaining_budget
    );

    for entry in &report.wallets {
        // write! to a String cannot fail
        let _ = writeln!(
            summary,
            "  {} | Rp{} -> Rp{} (income Rp{}, expenses Rp{})",
            entry.wallet_name,
            entry.opening_balance,
            entry.closing_balance,
            entry.income_total,
            entry.expense_total
        );
    }

    summary
}
