//! Proposal records and the per-proposal vote ledger

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config;
use crate::error::{GovernanceError, Result};

/// Lifecycle status of a proposal.
///
/// Settlement moves a proposal straight from `Active` to a terminal state;
/// there is no observable passed-but-not-yet-executed window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Accepting votes until the deadline
    Active,
    /// Settled below the approval threshold
    Failed,
    /// Settled at or above the approval threshold and executed
    Executed,
}

/// A single recorded vote.
///
/// Weight is the voter's balance at cast time and is never re-read from
/// the ledger, so later balance changes cannot inflate or deflate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub voter: String,
    pub support: bool,
    pub weight: u64,
    pub timestamp: u64,
}

/// A governance proposal with its accumulated tallies and vote records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub description: String,
    pub proposer: String,
    pub yes_votes: u64,
    pub no_votes: u64,
    pub created_at: u64,
    pub deadline: u64,
    pub executed: bool,
    pub status: ProposalStatus,
    votes: HashMap<String, Vote>,
}

impl Proposal {
    pub(crate) fn new(
        id: u64,
        proposer: String,
        description: String,
        voting_period_secs: u64,
        now: u64,
    ) -> Self {
        Self {
            id,
            description,
            proposer,
            yes_votes: 0,
            no_votes: 0,
            created_at: now,
            deadline: now + voting_period_secs,
            executed: false,
            status: ProposalStatus::Active,
            votes: HashMap::new(),
        }
    }

    /// Whether votes are still being accepted at `now`.
    pub fn is_voting_open(&self, now: u64) -> bool {
        self.status == ProposalStatus::Active && now <= self.deadline
    }

    /// Accumulated tallies as (yes, no, total).
    pub fn vote_counts(&self) -> (u64, u64, u64) {
        (
            self.yes_votes,
            self.no_votes,
            self.yes_votes.saturating_add(self.no_votes),
        )
    }

    pub fn has_voted(&self, account: &str) -> bool {
        self.votes.contains_key(account)
    }

    pub fn get_vote(&self, account: &str) -> Option<&Vote> {
        self.votes.get(account)
    }

    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.values()
    }

    /// Record a vote and fold its weight into the matching tally.
    ///
    /// The uniqueness check and the tally update happen in the same
    /// `&mut self` call, so one account's weight can never be counted
    /// twice.
    pub(crate) fn cast_vote(
        &mut self,
        voter: String,
        support: bool,
        weight: u64,
        now: u64,
    ) -> Result<()> {
        if self.status != ProposalStatus::Active {
            return Err(GovernanceError::ProposalNotActive(self.id));
        }
        if now > self.deadline {
            return Err(GovernanceError::VotingEnded {
                deadline: self.deadline,
                now,
            });
        }
        if weight == 0 {
            return Err(GovernanceError::NoVotingPower(voter));
        }
        if self.votes.contains_key(&voter) {
            return Err(GovernanceError::AlreadyVoted {
                proposal_id: self.id,
                voter,
            });
        }
        // Weights are point-in-time balances, so summed weights are not
        // bounded by total supply. The combined tally must stay within u64.
        if self
            .yes_votes
            .checked_add(self.no_votes)
            .and_then(|total| total.checked_add(weight))
            .is_none()
        {
            return Err(GovernanceError::TallyOverflow(self.id));
        }

        if support {
            self.yes_votes += weight;
        } else {
            self.no_votes += weight;
        }
        self.votes.insert(
            voter.clone(),
            Vote {
                voter,
                support,
                weight,
                timestamp: now,
            },
        );
        Ok(())
    }

    /// Compute the outcome and fix it permanently.
    ///
    /// Only callable once, strictly after the deadline. Returns whether the
    /// proposal passed. Zero turnout fails outright rather than dividing
    /// by zero; a tie at exactly the threshold passes.
    pub(crate) fn settle(&mut self, now: u64) -> Result<bool> {
        if self.executed {
            return Err(GovernanceError::AlreadyExecuted(self.id));
        }
        if now <= self.deadline {
            return Err(GovernanceError::DeadlineNotReached {
                deadline: self.deadline,
                now,
            });
        }

        let total = self.yes_votes.saturating_add(self.no_votes);
        let passed = total > 0
            && (self.yes_votes as u128 * config::BASIS_POINTS as u128) / total as u128
                >= config::VOTING_THRESHOLD as u128;

        self.executed = true;
        self.status = if passed {
            ProposalStatus::Executed
        } else {
            ProposalStatus::Failed
        };
        Ok(passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(1, "alice".to_string(), "Test".to_string(), 3600, 1000)
    }

    #[test]
    fn test_new_proposal_is_active() {
        let p = proposal();
        assert_eq!(p.status, ProposalStatus::Active);
        assert!(!p.executed);
        assert_eq!(p.deadline, 4600);
        assert_eq!(p.vote_counts(), (0, 0, 0));
    }

    #[test]
    fn test_cast_vote_accumulates_weight() {
        let mut p = proposal();
        p.cast_vote("alice".to_string(), true, 500, 2000).unwrap();
        p.cast_vote("bob".to_string(), false, 300, 2001).unwrap();

        assert_eq!(p.vote_counts(), (500, 300, 800));
        assert!(p.has_voted("alice"));
        assert!(!p.has_voted("carol"));
        assert_eq!(p.get_vote("bob").unwrap().weight, 300);
    }

    #[test]
    fn test_double_vote_rejected() {
        let mut p = proposal();
        p.cast_vote("alice".to_string(), true, 500, 2000).unwrap();

        let result = p.cast_vote("alice".to_string(), false, 500, 2001);
        assert!(matches!(
            result,
            Err(GovernanceError::AlreadyVoted { proposal_id: 1, .. })
        ));
        assert_eq!(p.vote_counts(), (500, 0, 500));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let mut p = proposal();
        let result = p.cast_vote("alice".to_string(), true, 0, 2000);
        assert!(matches!(result, Err(GovernanceError::NoVotingPower(_))));
    }

    #[test]
    fn test_vote_after_deadline_rejected() {
        let mut p = proposal();
        // deadline itself is still votable, one past is not
        p.cast_vote("alice".to_string(), true, 100, 4600).unwrap();
        let result = p.cast_vote("bob".to_string(), true, 100, 4601);
        assert!(matches!(result, Err(GovernanceError::VotingEnded { .. })));
    }

    #[test]
    fn test_settle_before_deadline_rejected() {
        let mut p = proposal();
        let result = p.settle(4600);
        assert!(matches!(
            result,
            Err(GovernanceError::DeadlineNotReached {
                deadline: 4600,
                now: 4600,
            })
        ));
        assert_eq!(p.status, ProposalStatus::Active);
    }

    #[test]
    fn test_settle_tie_passes() {
        let mut p = proposal();
        p.cast_vote("a".to_string(), true, 500, 2000).unwrap();
        p.cast_vote("b".to_string(), false, 500, 2000).unwrap();

        // 500/1000 = exactly 5000 bps, >= threshold
        assert!(p.settle(4601).unwrap());
        assert_eq!(p.status, ProposalStatus::Executed);
        assert!(p.executed);
    }

    #[test]
    fn test_settle_just_below_threshold_fails() {
        let mut p = proposal();
        p.cast_vote("a".to_string(), true, 499, 2000).unwrap();
        p.cast_vote("b".to_string(), false, 501, 2000).unwrap();

        assert!(!p.settle(4601).unwrap());
        assert_eq!(p.status, ProposalStatus::Failed);
        assert!(p.executed);
    }

    #[test]
    fn test_settle_zero_turnout_fails() {
        let mut p = proposal();
        assert!(!p.settle(4601).unwrap());
        assert_eq!(p.status, ProposalStatus::Failed);
    }

    #[test]
    fn test_settle_twice_rejected() {
        let mut p = proposal();
        p.cast_vote("a".to_string(), true, 100, 2000).unwrap();
        assert!(p.settle(4601).unwrap());

        let result = p.settle(4602);
        assert!(matches!(result, Err(GovernanceError::AlreadyExecuted(1))));
        assert_eq!(p.status, ProposalStatus::Executed);
    }

    #[test]
    fn test_vote_on_settled_proposal_rejected() {
        let mut p = proposal();
        p.settle(4601).unwrap();

        let result = p.cast_vote("a".to_string(), true, 100, 4602);
        assert!(matches!(result, Err(GovernanceError::ProposalNotActive(1))));
    }

    #[test]
    fn test_tally_overflow_rejected() {
        let mut p = proposal();
        p.cast_vote("a".to_string(), true, u64::MAX, 2000).unwrap();

        let result = p.cast_vote("b".to_string(), true, u64::MAX, 2001);
        assert!(matches!(result, Err(GovernanceError::TallyOverflow(1))));
        assert!(!p.has_voted("b"));
        assert_eq!(p.vote_counts(), (u64::MAX, 0, u64::MAX));

        // The combined tally is what must fit, so the other side is
        // capped too
        let result = p.cast_vote("c".to_string(), false, 1, 2002);
        assert!(matches!(result, Err(GovernanceError::TallyOverflow(1))));
        assert_eq!(p.vote_counts(), (u64::MAX, 0, u64::MAX));
    }

    #[test]
    fn test_tally_matches_vote_records() {
        let mut p = proposal();
        p.cast_vote("a".to_string(), true, 500, 2000).unwrap();
        p.cast_vote("b".to_string(), false, 300, 2000).unwrap();
        p.cast_vote("c".to_string(), true, 200, 2000).unwrap();

        let recorded: u64 = p.votes().map(|v| v.weight).sum();
        assert_eq!(recorded, p.yes_votes + p.no_votes);
    }
}
