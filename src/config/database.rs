//! Database connection and table creation using SeaORM.
//!
//! Tables are generated straight from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    Category, CategoryBudget, Debt, Expense, ExpenseSplit, Income, Period, RecurringRule,
    SavingGoal, User, Wallet,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions. Idempotent: existing
/// tables are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Wallet),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Period),
        schema.create_table_from_entity(CategoryBudget),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(ExpenseSplit),
        schema.create_table_from_entity(Income),
        schema.create_table_from_entity(SavingGoal),
        schema.create_table_from_entity(Debt),
        schema.create_table_from_entity(RecurringRule),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(builder.build(&statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{expense, period, wallet};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<wallet::Model> = Wallet::find().limit(1).all(&db).await?;
        let _: Vec<period::Model> = Period::find().limit(1).all(&db).await?;
        let _: Vec<expense::Model> = Expense::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<wallet::Model> = Wallet::find().limit(1).all(&db).await?;
        Ok(())
    }
}
