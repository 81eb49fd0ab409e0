//! SeaORM entity definitions for database tables.
//!
//! Transactions are independently keyed rows with a foreign key to their
//! budget period; a period is an aggregate over those rows, never a mutable
//! blob of its own.

/// Category master list
pub mod category;
/// Per-period snapshot of category budgets
pub mod category_budget;
/// Tracked debts, referenced by expenses
pub mod debt;
/// Expense transactions
pub mod expense;
/// Category shares of a split expense
pub mod expense_split;
/// Income transactions
pub mod income;
/// Budget periods (one open, the rest archived)
pub mod period;
/// Monthly recurring transaction rules
pub mod recurring_rule;
/// Savings goals, referenced by expenses
pub mod saving_goal;
/// Minimal identity records for the auth boundary
pub mod user;
/// Wallets (cash, bank accounts, e-money)
pub mod wallet;

pub use category::Entity as Category;
pub use category_budget::Entity as CategoryBudget;
pub use debt::Entity as Debt;
pub use expense::Entity as Expense;
pub use expense_split::Entity as ExpenseSplit;
pub use income::Entity as Income;
pub use period::Entity as Period;
pub use recurring_rule::Entity as RecurringRule;
pub use saving_goal::Entity as SavingGoal;
pub use user::Entity as User;
pub use wallet::Entity as Wallet;
