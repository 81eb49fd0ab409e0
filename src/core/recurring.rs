//! Recurring transaction rules.
//!
//! A rule names a template (expense or income) and a day of the month. Once
//! per calendar month, on or after that day, applying the rules materializes
//! a real transaction in the open period and stamps the rule so it does not
//! fire again until the next month. Months shorter than the scheduled day
//! clamp to their last day.

use crate::{
    core::period,
    entities::{RecurringRule, expense, income, recurring_rule},
    errors::{Error, Result},
};
use chrono::Datelike;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::info;

/// Rule kind for an expense template.
pub const KIND_EXPENSE: &str = "expense";
/// Rule kind for an income template.
pub const KIND_INCOME: &str = "income";

/// Input for creating a rule.
#[derive(Debug, Clone)]
pub struct NewRule {
    /// Either [`KIND_EXPENSE`] or [`KIND_INCOME`]
    pub kind: String,
    pub name: String,
    pub base_amount: i64,
    pub admin_fee: i64,
    pub wallet_id: i64,
    /// Required for expense rules, ignored for income rules
    pub category_id: Option<i64>,
    /// Scheduled day, 1 through 31
    pub day_of_month: i32,
}

/// One transaction materialized by [`apply_due_rules`].
#[derive(Debug, Clone, Serialize)]
pub struct AppliedRule {
    pub rule_id: i64,
    pub name: String,
    pub kind: String,
    /// Recorded transaction amount after fee semantics
    pub amount: i64,
}

fn days_in_month(date: Date) -> u32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    chrono::NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// Whether a rule should fire today: the scheduled day (clamped to the
/// month's length) has been reached and the rule has not fired this month.
#[must_use]
pub fn is_rule_due(rule: &recurring_rule::Model, today: Date) -> bool {
    let effective_day = u32::try_from(rule.day_of_month)
        .unwrap_or(1)
        .min(days_in_month(today));
    if today.day() < effective_day {
        return false;
    }
    rule.last_applied.is_none_or(|applied| {
        applied.year() != today.year() || applied.month() != today.month()
    })
}

/// Retrieves all of a user's rules, ordered by name.
pub async fn list_rules(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<recurring_rule::Model>> {
    RecurringRule::find()
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .order_by_asc(recurring_rule::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a rule. Expense rules must carry a category so the materialized
/// expenses are categorized.
pub async fn create_rule(
    db: &DatabaseConnection,
    user_id: &str,
    new: NewRule,
) -> Result<recurring_rule::Model> {
    if new.kind != KIND_EXPENSE && new.kind != KIND_INCOME {
        return Err(Error::Validation {
            message: format!("Unknown rule kind '{}'", new.kind),
        });
    }
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
    if !(1..=31).contains(&new.day_of_month) {
        return Err(Error::Validation {
            message: format!("Day of month {} is out of range", new.day_of_month),
        });
    }
    if new.kind == KIND_EXPENSE && new.category_id.is_none() {
        return Err(Error::Validation {
            message: "Expense rules require a category".to_string(),
        });
    }

    recurring_rule::ActiveModel {
        user_id: Set(user_id.to_string()),
        kind: Set(new.kind),
        name: Set(new.name),
        base_amount: Set(new.base_amount),
        admin_fee: Set(new.admin_fee),
        wallet_id: Set(new.wallet_id),
        category_id: Set(new.category_id),
        day_of_month: Set(new.day_of_month),
        last_applied: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Deletes a rule by id. Transactions it already materialized are kept.
pub async fn delete_rule(db: &DatabaseConnection, rule_id: i64) -> Result<()> {
    let existing = RecurringRule::find_by_id(rule_id)
        .one(db)
        .await?
        .ok_or(Error::RecurringRuleNotFound { id: rule_id })?;

    existing.delete(db).await?;
    Ok(())
}

/// Materializes every due rule into the open period. All inserted
/// transactions and `last_applied` stamps commit together.
pub async fn apply_due_rules(
    db: &DatabaseConnection,
    user_id: &str,
    today: Date,
) -> Result<Vec<AppliedRule>> {
    let rules = list_rules(db, user_id).await?;
    let due: Vec<recurring_rule::Model> = rules
        .into_iter()
        .filter(|rule| is_rule_due(rule, today))
        .collect();
    if due.is_empty() {
        return Ok(Vec::new());
    }

    let open = period::ensure_current_period(db, user_id).await?;

    let txn = db.begin().await?;
    let mut applied = Vec::with_capacity(due.len());

    for rule in due {
        let amount = if rule.kind == KIND_INCOME {
            let amount = rule.base_amount - rule.admin_fee;
            income::ActiveModel {
                period_id: Set(open.id),
                wallet_id: Set(rule.wallet_id),
                amount: Set(amount),
                base_amount: Set(rule.base_amount),
                admin_fee: Set(rule.admin_fee),
                date: Set(today),
                notes: Set(rule.name.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            amount
        } else {
            let amount = rule.base_amount + rule.admin_fee;
            expense::ActiveModel {
                period_id: Set(open.id),
                wallet_id: Set(rule.wallet_id),
                category_id: Set(rule.category_id),
                is_split: Set(false),
                amount: Set(amount),
                base_amount: Set(rule.base_amount),
                admin_fee: Set(rule.admin_fee),
                date: Set(today),
                notes: Set(rule.name.clone()),
                saving_goal_id: Set(None),
                debt_id: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            amount
        };

        let summary = AppliedRule {
            rule_id: rule.id,
            name: rule.name.clone(),
            kind: rule.kind.clone(),
            amount,
        };

        let mut active: recurring_rule::ActiveModel = rule.into();
        active.last_applied = Set(Some(today));
        active.update(&txn).await?;

        applied.push(summary);
    }

    txn.commit().await?;

    info!(user = user_id, count = applied.len(), "applied recurring rules");
    Ok(applied)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::period as period_ops;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use sea_orm::PaginatorTrait;

    fn date(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense_rule(wallet_id: i64, category_id: i64, day: i32) -> NewRule {
        NewRule {
            kind: KIND_EXPENSE.to_string(),
            name: "Internet".to_string(),
            base_amount: 300_000,
            admin_fee: 0,
            wallet_id,
            category_id: Some(category_id),
            day_of_month: day,
        }
    }

    #[tokio::test]
    async fn test_create_rule_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;
        let cat = create_test_category(&db, "Tagihan", 0).await?;

        let bad_kind = create_rule(
            &db,
            TEST_USER,
            NewRule {
                kind: "weekly".to_string(),
                ..expense_rule(wallet.id, cat.id, 5)
            },
        )
        .await;
        assert!(matches!(bad_kind.unwrap_err(), Error::Validation { .. }));

        let bad_day = create_rule(
            &db,
            TEST_USER,
            NewRule {
                day_of_month: 32,
                ..expense_rule(wallet.id, cat.id, 5)
            },
        )
        .await;
        assert!(matches!(bad_day.unwrap_err(), Error::Validation { .. }));

        let uncategorized = create_rule(
            &db,
            TEST_USER,
            NewRule {
                category_id: None,
                ..expense_rule(wallet.id, cat.id, 5)
            },
        )
        .await;
        assert!(matches!(uncategorized.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_rule_due_once_per_month() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;
        let cat = create_test_category(&db, "Tagihan", 0).await?;

        let rule = create_rule(&db, TEST_USER, expense_rule(wallet.id, cat.id, 5)).await?;

        assert!(!is_rule_due(&rule, date(2024, 3, 4)));
        assert!(is_rule_due(&rule, date(2024, 3, 5)));
        assert!(is_rule_due(&rule, date(2024, 3, 20)));

        let applied = apply_due_rules(&db, TEST_USER, date(2024, 3, 5)).await?;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].amount, 300_000);

        // Already stamped for March; due again in April.
        let rule = RecurringRule::find_by_id(rule.id).one(&db).await?.unwrap();
        assert_eq!(rule.last_applied, Some(date(2024, 3, 5)));
        assert!(!is_rule_due(&rule, date(2024, 3, 20)));
        assert!(is_rule_due(&rule, date(2024, 4, 5)));

        let again = apply_due_rules(&db, TEST_USER, date(2024, 3, 20)).await?;
        assert!(again.is_empty());
        assert_eq!(crate::entities::Expense::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_short_month_clamps_scheduled_day() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;
        let cat = create_test_category(&db, "Tagihan", 0).await?;

        let rule = create_rule(&db, TEST_USER, expense_rule(wallet.id, cat.id, 31)).await?;

        // February 2024 has 29 days; day 31 clamps to the 29th.
        assert!(!is_rule_due(&rule, date(2024, 2, 28)));
        assert!(is_rule_due(&rule, date(2024, 2, 29)));

        Ok(())
    }

    #[tokio::test]
    async fn test_income_rule_materializes_with_fee_semantics() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;

        create_rule(
            &db,
            TEST_USER,
            NewRule {
                kind: KIND_INCOME.to_string(),
                name: "Gaji".to_string(),
                base_amount: 5_000_000,
                admin_fee: 2_500,
                wallet_id: wallet.id,
                category_id: None,
                day_of_month: 25,
            },
        )
        .await?;

        let applied = apply_due_rules(&db, TEST_USER, date(2024, 3, 25)).await?;
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].amount, 4_997_500);

        let open = period_ops::current_period(&db, TEST_USER).await?.unwrap();
        let incomes = period_ops::period_incomes(&db, open.id).await?;
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].notes, "Gaji");
        assert_eq!(incomes[0].wallet_id, wallet.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_rule_keeps_materialized_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let wallet = create_test_wallet(&db, "Bank").await?;
        let cat = create_test_category(&db, "Tagihan", 0).await?;

        let rule = create_rule(&db, TEST_USER, expense_rule(wallet.id, cat.id, 1)).await?;
        apply_due_rules(&db, TEST_USER, date(2024, 3, 1)).await?;

        delete_rule(&db, rule.id).await?;
        assert!(list_rules(&db, TEST_USER).await?.is_empty());
        assert_eq!(crate::entities::Expense::find().count(&db).await?, 1);

        let missing = delete_rule(&db, rule.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::RecurringRuleNotFound { .. }
        ));

        Ok(())
    }
}
