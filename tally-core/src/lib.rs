//! tally-core: transaction records shared by the statement engine and its consumers

pub mod summary;
pub mod transaction;

pub use summary::{MonthTotals, Totals};
pub use transaction::{StatementFormat, Transaction, TransactionType};
