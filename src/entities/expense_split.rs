//! One category's share of a split expense.
//!
//! Share amounts for an expense sum exactly to the expense amount; the
//! invariant is enforced at write time in `core::expense`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense split database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    /// Unique identifier for the share
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Expense this share belongs to
    pub expense_id: i64,
    /// Category receiving this share
    pub category_id: i64,
    /// Share amount in minor units
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each share belongs to one expense
    #[sea_orm(
        belongs_to = "super::expense::Entity",
        from = "Column::ExpenseId",
        to = "super::expense::Column::Id"
    )]
    Expense,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
