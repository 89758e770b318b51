//! Proposal registry state machine
//!
//! Single-writer state machine: every mutation goes through `&mut self`,
//! so each check-then-update sequence applies as one indivisible unit.
//! Time is an explicit argument; the service layer supplies the wall
//! clock and tests supply their own.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use ledger::TokenLedger;

use crate::config;
use crate::error::{GovernanceError, Result};
use crate::proposal::{Proposal, ProposalStatus};

/// Read-only view of voting weight.
///
/// The registry's sole dependency on the token ledger. Balances are read
/// once at proposal creation (minimum-balance gate) and once at vote cast
/// (weight capture), never retroactively.
pub trait BalanceSource {
    fn balance_of(&self, account: &str) -> u64;
}

impl BalanceSource for TokenLedger {
    fn balance_of(&self, account: &str) -> u64 {
        TokenLedger::balance_of(self, account)
    }
}

/// Append-only registry of proposals. Ids are sequential from 1 and never
/// reused; proposals are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: HashMap<u64, Proposal>,
    proposal_count: u64,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self {
            proposals: HashMap::new(),
            proposal_count: 0,
        }
    }

    /// Create a proposal and return its id.
    ///
    /// The caller must hold at least `MIN_TOKENS_TO_PROPOSE` at this
    /// moment; the description must be non-empty and the voting period
    /// within bounds.
    pub fn create_proposal(
        &mut self,
        balances: &impl BalanceSource,
        caller: &str,
        description: String,
        voting_period_secs: u64,
        now: u64,
    ) -> Result<u64> {
        let available = balances.balance_of(caller);
        if available < config::MIN_TOKENS_TO_PROPOSE {
            return Err(GovernanceError::InsufficientBalance {
                required: config::MIN_TOKENS_TO_PROPOSE,
                available,
            });
        }
        if description.is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }
        if voting_period_secs < config::MIN_VOTING_PERIOD_SECS {
            return Err(GovernanceError::VotingPeriodTooShort {
                min: config::MIN_VOTING_PERIOD_SECS,
                got: voting_period_secs,
            });
        }
        if voting_period_secs > config::MAX_VOTING_PERIOD_SECS {
            return Err(GovernanceError::VotingPeriodTooLong {
                max: config::MAX_VOTING_PERIOD_SECS,
                got: voting_period_secs,
            });
        }

        let id = self.proposal_count + 1;
        self.proposals.insert(
            id,
            Proposal::new(id, caller.to_string(), description, voting_period_secs, now),
        );
        self.proposal_count = id;
        Ok(id)
    }

    /// Cast a vote, capturing the caller's current balance as its weight.
    /// Returns the captured weight.
    pub fn vote(
        &mut self,
        balances: &impl BalanceSource,
        caller: &str,
        proposal_id: u64,
        support: bool,
        now: u64,
    ) -> Result<u64> {
        let weight = balances.balance_of(caller);
        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        proposal.cast_vote(caller.to_string(), support, weight, now)?;
        Ok(weight)
    }

    /// Settle a proposal strictly after its deadline. Returns whether it
    /// passed. A second call on the same proposal errors and never
    /// recomputes the terminal result.
    pub fn settle(&mut self, proposal_id: u64, now: u64) -> Result<bool> {
        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))?;
        proposal.settle(now)
    }

    pub fn get_proposal(&self, proposal_id: u64) -> Result<&Proposal> {
        self.proposals
            .get(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(proposal_id))
    }

    /// Accumulated tallies as (yes, no, total).
    pub fn get_vote_counts(&self, proposal_id: u64) -> Result<(u64, u64, u64)> {
        Ok(self.get_proposal(proposal_id)?.vote_counts())
    }

    pub fn is_voting_active(&self, proposal_id: u64, now: u64) -> Result<bool> {
        Ok(self.get_proposal(proposal_id)?.is_voting_open(now))
    }

    /// Whether `account` has a vote record on the proposal. Missing
    /// proposals read as false.
    pub fn has_voted(&self, proposal_id: u64, account: &str) -> bool {
        self.proposals
            .get(&proposal_id)
            .map(|p| p.has_voted(account))
            .unwrap_or(false)
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposal_count
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn proposals_by_status(&self, status: ProposalStatus) -> Vec<&Proposal> {
        self.proposals
            .values()
            .filter(|p| p.status == status)
            .collect()
    }
}

impl Default for ProposalRegistry {
    fn default() -> Self {
        Self::new()
    }
}
