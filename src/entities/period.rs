//! Budget period entity.
//!
//! Exactly one period per user is open (`period_end` is NULL). Closing a
//! period freezes it: `period_end` and the three summary totals are written
//! once by the reconciliation and never touched again. Transactions keep
//! their `period_id`, so a closed row together with its transactions is the
//! complete archive snapshot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget period database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    /// Unique identifier for the period
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the period
    pub user_id: String,
    /// When the period was opened
    pub period_start: DateTimeUtc,
    /// When the period was closed; NULL while the period is open
    pub period_end: Option<DateTimeUtc>,
    /// Frozen at close: base budget plus added incomes
    pub total_income: Option<i64>,
    /// Frozen at close: sum of all expense amounts
    pub total_expenses: Option<i64>,
    /// Frozen at close: `total_income - total_expenses`
    pub remaining_budget: Option<i64>,
}

/// Defines relationships between Period and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One period has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One period has many incomes
    #[sea_orm(has_many = "super::income::Entity")]
    Incomes,
    /// One period has many category budget snapshots
    #[sea_orm(has_many = "super::category_budget::Entity")]
    CategoryBudgets,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incomes.def()
    }
}

impl Related<super::category_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryBudgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
