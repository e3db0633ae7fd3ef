//! Account statements ("estado de cuenta") and receivable aging.

pub mod aging;
pub mod statement;

pub use aging::AgingBuckets;
pub use statement::{
    Statement, StatementCommand, StatementEvent, StatementField, StatementHeader,
    StatementHeaderChange, Transaction, TransactionChange, TransactionField,
};
