//! Thread-safe governance service
//!
//! Wraps the registry in a single write lock so every mutating call
//! applies as one atomic unit (check-then-update plus the balance read),
//! shares the token ledger with the host, and fans out event
//! notifications over a broadcast channel.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::info;

use ledger::TokenLedger;

use crate::error::Result;
use crate::events::GovernanceEvent;
use crate::proposal::Proposal;
use crate::registry::ProposalRegistry;

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct GovernanceService {
    registry: RwLock<ProposalRegistry>,
    ledger: Arc<RwLock<TokenLedger>>,
    events: broadcast::Sender<GovernanceEvent>,
}

impl GovernanceService {
    /// Create a service over a ledger shared with the host. The host keeps
    /// minting and transferring through its own handle; this service only
    /// reads balances.
    pub fn new(ledger: Arc<RwLock<TokenLedger>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            registry: RwLock::new(ProposalRegistry::new()),
            ledger,
            events,
        }
    }

    /// Subscribe to governance event notifications. Events are published
    /// in application order. Lagging subscribers miss events; they never
    /// block or fail mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<GovernanceEvent> {
        self.events.subscribe()
    }

    pub fn create_proposal(
        &self,
        caller: &str,
        description: impl Into<String>,
        voting_period_secs: u64,
    ) -> Result<u64> {
        let description = description.into();
        let now = current_timestamp();
        let ledger = self.ledger.read();
        let mut registry = self.registry.write();
        let id =
            registry.create_proposal(&*ledger, caller, description.clone(), voting_period_secs, now)?;
        drop(ledger);
        let deadline = now + voting_period_secs;

        info!(id, proposer = caller, deadline, "proposal created");
        // Sent while still holding the registry lock, so subscribers
        // observe events in application order.
        let _ = self.events.send(GovernanceEvent::ProposalCreated {
            id,
            proposer: caller.to_string(),
            description,
            deadline,
        });
        Ok(id)
    }

    pub fn vote(&self, caller: &str, proposal_id: u64, support: bool) -> Result<()> {
        let now = current_timestamp();
        let ledger = self.ledger.read();
        let mut registry = self.registry.write();
        let weight = registry.vote(&*ledger, caller, proposal_id, support, now)?;
        drop(ledger);

        info!(proposal_id, voter = caller, support, weight, "vote cast");
        let _ = self.events.send(GovernanceEvent::VoteCast {
            id: proposal_id,
            voter: caller.to_string(),
            support,
            weight,
        });
        Ok(())
    }

    pub fn settle(&self, proposal_id: u64) -> Result<bool> {
        let now = current_timestamp();
        let mut registry = self.registry.write();
        let passed = registry.settle(proposal_id, now)?;

        info!(proposal_id, passed, "proposal settled");
        let _ = self
            .events
            .send(GovernanceEvent::Settled { id: proposal_id, passed });
        Ok(passed)
    }

    pub fn get_proposal(&self, proposal_id: u64) -> Result<Proposal> {
        Ok(self.registry.read().get_proposal(proposal_id)?.clone())
    }

    pub fn get_vote_counts(&self, proposal_id: u64) -> Result<(u64, u64, u64)> {
        self.registry.read().get_vote_counts(proposal_id)
    }

    pub fn is_voting_active(&self, proposal_id: u64) -> Result<bool> {
        self.registry
            .read()
            .is_voting_active(proposal_id, current_timestamp())
    }

    pub fn has_voted(&self, proposal_id: u64, account: &str) -> bool {
        self.registry.read().has_voted(proposal_id, account)
    }

    /// Current voting power of an account: its ledger balance.
    pub fn get_voting_power(&self, account: &str) -> u64 {
        self.ledger.read().balance_of(account)
    }

    pub fn proposal_count(&self) -> u64 {
        self.registry.read().proposal_count()
    }
}

fn current_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
