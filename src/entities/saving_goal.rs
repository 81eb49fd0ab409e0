//! Savings goal entity. Progress is derived from expenses tagged with the
//! goal id, never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "saving_goals")]
pub struct Model {
    /// Unique identifier for the goal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the goal
    pub user_id: String,
    /// Human-readable name
    pub name: String,
    /// Display icon identifier
    pub icon: String,
    /// Target amount in minor units
    pub target_amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
