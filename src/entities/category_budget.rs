//! Per-period snapshot of a category's budget.
//!
//! Copied from the category master list when a period opens and carried
//! forward unchanged by the reconciliation, so archived periods keep the
//! budgets that were in force at the time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_budgets")]
pub struct Model {
    /// Unique identifier for the snapshot row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Period this snapshot belongs to
    pub period_id: i64,
    /// Category the budget applies to
    pub category_id: i64,
    /// Budget in minor units for this category in this period
    pub budget: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one period
    #[sea_orm(
        belongs_to = "super::period::Entity",
        from = "Column::PeriodId",
        to = "super::period::Column::Id"
    )]
    Period,
}

impl Related<super::period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
