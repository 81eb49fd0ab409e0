//! Category business logic.
//!
//! Categories may be deleted even while transactions reference them; readers
//! resolve the dangling ids to "Uncategorized". The only protected rows are
//! essential categories, such as the reserved transfer category.

use crate::{
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Name of the system-reserved category used by wallet-to-wallet transfers.
pub const TRANSFER_CATEGORY: &str = "Transfer Between Wallets";

/// Retrieves all of a user's categories, ordered alphabetically by name.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its unique id.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: &str,
    name: String,
    icon: String,
    is_essential: bool,
    is_debt_category: bool,
    budget: i64,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }
    if budget < 0 {
        return Err(Error::InvalidAmount { amount: budget });
    }

    let model = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.trim().to_string()),
        icon: Set(icon),
        is_essential: Set(is_essential),
        is_debt_category: Set(is_debt_category),
        budget: Set(budget),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Updates a category's name or icon.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: Option<String>,
    icon: Option<String>,
) -> Result<category::Model> {
    let existing = get_category_by_id(db, category_id)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Category name cannot be empty".to_string(),
            });
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(icon) = icon {
        active.icon = Set(icon);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a category. Essential categories are refused; transactions that
/// referenced the deleted category keep their id and display as
/// "Uncategorized".
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let existing = get_category_by_id(db, category_id)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    if existing.is_essential {
        return Err(Error::EssentialCategory {
            name: existing.name,
        });
    }

    Category::delete_by_id(category_id).exec(db).await?;
    Ok(())
}

/// Finds the user's reserved transfer category, creating it on first use.
/// Generic over the connection so transfers can call it inside their own
/// transaction.
pub async fn ensure_transfer_category<C>(db: &C, user_id: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let existing = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(TRANSFER_CATEGORY))
        .one(db)
        .await?;

    if let Some(found) = existing {
        return Ok(found);
    }

    category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(TRANSFER_CATEGORY.to_string()),
        icon: Set("transfer".to_string()),
        is_essential: Set(true),
        is_debt_category: Set(false),
        budget: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
