//! Income entity.
//!
//! `amount = base_amount - admin_fee` (the fee reduces what is actually
//! received), so `admin_fee` may never exceed `base_amount`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Period this income belongs to
    pub period_id: i64,
    /// Wallet the money entered
    pub wallet_id: i64,
    /// Amount received in minor units: `base_amount - admin_fee`
    pub amount: i64,
    /// Amount before the admin fee
    pub base_amount: i64,
    /// Admin fee in minor units, zero when none
    pub admin_fee: i64,
    /// Transaction date
    pub date: Date,
    /// Free-form notes
    pub notes: String,
}

/// Defines relationships between Income and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each income belongs to one period
    #[sea_orm(
        belongs_to = "super::period::Entity",
        from = "Column::PeriodId",
        to = "super::period::Column::Id"
    )]
    Period,
    /// Each income belongs to one wallet
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
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

impl ActiveModelBehavior for ActiveModel {}
