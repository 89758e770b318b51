//! Governance error types
//!
//! Three informal groups: validation errors (fix the input and retry),
//! authorization errors (retryable only after a balance change), and
//! state errors (the caller's view of the proposal is stale).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovernanceError {
    // Validation
    #[error("Proposal description cannot be empty")]
    EmptyDescription,

    #[error("Voting period too short: minimum {min}s, got {got}s")]
    VotingPeriodTooShort { min: u64, got: u64 },

    #[error("Voting period too long: maximum {max}s, got {got}s")]
    VotingPeriodTooLong { max: u64, got: u64 },

    // Authorization
    #[error("Insufficient balance to propose: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Account {0} has no voting power")]
    NoVotingPower(String),

    // State
    #[error("Proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("Proposal {0} is not active")]
    ProposalNotActive(u64),

    #[error("Voting ended at {deadline}, current time {now}")]
    VotingEnded { deadline: u64, now: u64 },

    #[error("Account {voter} has already voted on proposal {proposal_id}")]
    AlreadyVoted { proposal_id: u64, voter: String },

    #[error("Voting deadline not reached: deadline {deadline}, current time {now}")]
    DeadlineNotReached { deadline: u64, now: u64 },

    #[error("Proposal {0} has already been executed")]
    AlreadyExecuted(u64),

    #[error("Vote tally overflow on proposal {0}")]
    TallyOverflow(u64),
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
