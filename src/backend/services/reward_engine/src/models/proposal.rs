use serde::{Deserialize, Serialize};

/// Voting status of a governance proposal, as reported through gov hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    VotingPeriod,
    VotingEnded,
}
