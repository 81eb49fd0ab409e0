//! Expense entity.
//!
//! `amount = base_amount + admin_fee` (the fee increases the outflow). A
//! split expense has `is_split = true`, no `category_id`, and one
//! `expense_splits` row per category share; otherwise exactly one
//! `category_id` applies. Category, goal, and debt references are not
//! enforced - readers must resolve missing ids to display defaults.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Period this expense belongs to
    pub period_id: i64,
    /// Wallet the money left
    pub wallet_id: i64,
    /// Category, None when the expense is split across several
    pub category_id: Option<i64>,
    /// Whether the amount is divided over `expense_splits` rows
    pub is_split: bool,
    /// Total outflow in minor units: `base_amount + admin_fee`
    pub amount: i64,
    /// Amount before the admin fee
    pub base_amount: i64,
    /// Admin fee in minor units, zero when none
    pub admin_fee: i64,
    /// Transaction date
    pub date: Date,
    /// Free-form notes
    pub notes: String,
    /// Savings goal this expense contributes to, if any
    pub saving_goal_id: Option<i64>,
    /// Debt this expense pays down, if any
    pub debt_id: Option<i64>,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one period
    #[sea_orm(
        belongs_to = "super::period::Entity",
        from = "Column::PeriodId",
        to = "super::period::Column::Id"
    )]
    Period,
    /// Each expense belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
    /// A split expense has many category shares
    #[sea_orm(has_many = "super::expense_split::Entity")]
    Splits,
}

impl Related<super::period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::expense_split::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
