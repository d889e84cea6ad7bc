pub mod account_state;
pub mod action;
pub mod claim;
pub mod distribution;
pub mod event;
pub mod program;
pub mod proposal;
pub mod staking;

pub use account_state::{ActionCounter, ClaimStatus, RewardAccountState};
pub use action::{
    ActionDelegate, ActionTransfer, ActionVote, EvaluationResult, QualifyingAction, ACTION_TYPE_DELEGATE,
    ACTION_TYPE_TRANSFER, ACTION_TYPE_VOTE,
};
pub use claim::{ClaimAllRewardsDetail, ClaimedRewardPeriodDetail, RewardAccountResponse, RewardProgramClaimDetail};
pub use distribution::ClaimPeriodRewardDistribution;
pub use event::{EventCriteria, ExpectedEvent};
pub use program::{ProgramState, ProgramTerms, RewardProgram};
pub use proposal::ProposalStatus;
pub use staking::{BondStatus, Delegation, Validator};
