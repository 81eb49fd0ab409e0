//! Category entity - the master list of spending categories.
//!
//! `budget` is the user's standing monthly budget for the category; each
//! period snapshots it into `category_budgets` so archives stay stable when
//! the master list changes. Essential categories (system-reserved ones such
//! as "Transfer Between Wallets") cannot be deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the category
    pub user_id: String,
    /// Human-readable name (e.g., "Makanan", "Transport")
    pub name: String,
    /// Display icon identifier
    pub icon: String,
    /// System-reserved categories that must not be deleted
    pub is_essential: bool,
    /// Whether this category records debt payments
    pub is_debt_category: bool,
    /// Standing budget in minor units, carried into new periods
    pub budget: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
