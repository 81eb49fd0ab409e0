//! User entity - minimal identity record for the auth boundary.
//!
//! Real authentication lives in an external identity provider; this table
//! only maps an opaque bearer token to a user id so mutating operations can
//! verify the caller owns the data they touch.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stable external user id (the "uid" every owned row is scoped by)
    #[sea_orm(unique)]
    pub username: String,
    /// Opaque session token presented as a bearer credential
    #[sea_orm(unique)]
    pub token: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
