//! Service layer for arus
//!
//! The service layer runs ledger operations against a user repository,
//! handling lookup, persistence and statement import.

pub mod finance;
pub mod import;

pub use finance::FinanceService;
pub use import::{ColumnMapping, StatementImporter};
