//! Account balances and supply tracking

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LedgerError, Result};

/// In-memory token ledger: account -> balance, plus running total supply.
///
/// Minting is gated on the admin identity configured at construction.
/// The sum of all balances always equals `total_supply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    admin: String,
    balances: HashMap<String, u64>,
    total_supply: u64,
}

impl TokenLedger {
    pub fn new(admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            balances: HashMap::new(),
            total_supply: 0,
        }
    }

    /// Current balance of an account. Unknown accounts read as zero.
    pub fn balance_of(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    /// Mint new tokens to a recipient. Admin-only.
    pub fn mint(&mut self, caller: &str, recipient: &str, amount: u64) -> Result<()> {
        if caller != self.admin {
            return Err(LedgerError::Unauthorized);
        }
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;

        *self.balances.entry(recipient.to_string()).or_insert(0) += amount;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Move tokens between accounts. Total supply is unchanged.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        // Debit before credit so a self-transfer nets out to zero.
        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= amount;
        }
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        Ok(())
    }

    /// Destroy tokens from the caller's own balance.
    pub fn burn(&mut self, caller: &str, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let available = self.balance_of(caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        if let Some(balance) = self.balances.get_mut(caller) {
            *balance -= amount;
        }
        self.total_supply -= amount;
        Ok(())
    }
}
