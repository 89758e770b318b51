//! TokenVote Balance Ledger
//!
//! Authoritative mapping of account -> token balance. The governance
//! registry reads voting weight from here through `balance_of` only;
//! minting, transfers and burns are this crate's exclusive job.

pub mod accounts;
pub mod error;

pub use accounts::TokenLedger;
pub use error::{LedgerError, Result};
