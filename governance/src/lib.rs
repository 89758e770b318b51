//! TokenVote Governance Module
//!
//! Token-weighted proposal voting: balances from the ledger become voting
//! weight, captured once per voter at cast time. Proposals run from
//! creation to a deadline, then a single settlement call fixes the outcome
//! against a basis-point approval threshold.

pub mod error;
pub mod events;
pub mod proposal;
pub mod registry;
pub mod service;

pub use error::{GovernanceError, Result};
pub use events::GovernanceEvent;
pub use proposal::{Proposal, ProposalStatus, Vote};
pub use registry::{BalanceSource, ProposalRegistry};
pub use service::GovernanceService;

/// Governance configuration constants
pub mod config {
    /// Minimum balance required to create a proposal
    pub const MIN_TOKENS_TO_PROPOSE: u64 = 100;

    /// Approval threshold in basis points (50.00%, ties pass)
    pub const VOTING_THRESHOLD: u64 = 5_000;

    /// Basis point denominator
    pub const BASIS_POINTS: u64 = 10_000;

    /// Shortest allowed voting period (1 minute)
    pub const MIN_VOTING_PERIOD_SECS: u64 = 60;

    /// Longest allowed voting period (30 days)
    pub const MAX_VOTING_PERIOD_SECS: u64 = 30 * 24 * 3600;
}
