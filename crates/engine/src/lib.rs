//! Ledger state engine for the masareef household finance tracker.
//!
//! The crate holds the entity model (users, expenses, commitments, monthly
//! records, chat messages), the derived-value calculator, the installment
//! accounting and month-archival transitions, and the message partitioner.
//! Everything here is pure and synchronous; persistence and remote sync live
//! in the `store` and `sync` crates.

pub use calc::{
    CommitmentTotals, LedgerSummary, active_expense_total, balance, commitment_totals,
    has_due_today, summarize,
};
pub use commitment::{COMMITMENT_KINDS, Commitment};
pub use error::EngineError;
pub use expense::{DEFAULT_EXPENSE_CATEGORIES, Expense};
pub use ledger::{Ledger, Theme};
pub use message::{BROADCAST, ChatMessage, Recipient, visible_messages};
pub use money::Money;
pub use record::MonthlyRecord;
pub use user::{BOOTSTRAP_ADMIN, User};

mod calc;
mod commitment;
mod error;
mod expense;
mod ledger;
mod message;
mod money;
mod record;
mod user;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
