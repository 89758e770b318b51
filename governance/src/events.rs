//! Event notifications for external consumers
//!
//! Indexers and UIs subscribe to these over the service's broadcast
//! channel. The state machine never depends on delivery.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: u64,
        proposer: String,
        description: String,
        deadline: u64,
    },
    VoteCast {
        id: u64,
        voter: String,
        support: bool,
        weight: u64,
    },
    Settled {
        id: u64,
        passed: bool,
    },
}
