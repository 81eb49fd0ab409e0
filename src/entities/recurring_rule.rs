//! Recurring transaction rule entity.
//!
//! A rule fires at most once per calendar month, on or after its
//! `day_of_month`; `last_applied` is the dedup marker.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_rules")]
pub struct Model {
    /// Unique identifier for the rule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the rule
    pub user_id: String,
    /// Kind of transaction to create: `"expense"` or `"income"`
    pub kind: String,
    /// Label used as the generated transaction's notes
    pub name: String,
    /// Amount before the admin fee, in minor units
    pub base_amount: i64,
    /// Admin fee in minor units, zero when none
    pub admin_fee: i64,
    /// Wallet the generated transaction applies to
    pub wallet_id: i64,
    /// Category for generated expenses; ignored for incomes
    pub category_id: Option<i64>,
    /// Day of the month the rule becomes due (1..=31)
    pub day_of_month: i32,
    /// Date the rule last fired; None if it never has
    pub last_applied: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
