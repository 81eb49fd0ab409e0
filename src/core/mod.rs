//! Core business logic - framework-agnostic budgeting operations.
//!
//! Every module here works directly against a SeaORM connection and returns
//! crate [`Result`](crate::errors::Result)s; nothing in `core` knows about
//! HTTP. Multi-row writes run inside a single database transaction.

/// Category CRUD and the reserved transfer category
pub mod category;
/// Expense recording, editing, deletion, and split validation
pub mod expense;
/// Income recording, editing, and deletion
pub mod income;
/// Budget periods and the period-close reconciliation
pub mod period;
/// Monthly recurring transaction rules
pub mod recurring;
/// Per-category summaries, goal and debt progress
pub mod report;
/// Tolerant parsing of AI extraction drafts
pub mod scan;
/// Wallet-to-wallet fund transfers
pub mod transfer;
/// Wallet CRUD, deletion guard, and balance derivation
pub mod wallet;
