//! Wallet entity - a place money lives (cash, bank account, e-money).
//!
//! `initial_balance` always means "balance as of the start of the currently
//! open period". Only the period-close reconciliation or a direct user edit
//! may change it; the displayed balance is always derived on top of it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wallet database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    /// Unique identifier for the wallet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the wallet
    pub user_id: String,
    /// Human-readable name (e.g., "BCA", "Cash")
    pub name: String,
    /// Display icon identifier
    pub icon: String,
    /// Balance in minor units as of the start of the open period
    pub initial_balance: i64,
}

/// Defines relationships between Wallet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One wallet has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One wallet has many incomes
    #[sea_orm(has_many = "super::income::Entity")]
    Incomes,
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

impl ActiveModelBehavior for ActiveModel {}
