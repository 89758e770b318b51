//! Ledger error types

use thiserror::Error;

/// Token ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[error("Unauthorized: only the admin may mint")]
    Unauthorized,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Total supply overflow")]
    SupplyOverflow,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
