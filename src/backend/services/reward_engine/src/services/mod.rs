pub mod builders;
pub mod cleanup;
pub mod detection;
pub mod evaluation;
pub mod hooks;
pub mod keeper;
pub mod lifecycle;
pub mod queries;
pub mod settlement;

pub use builders::ActionBuilder;
pub use detection::find_qualifying_actions;
pub use hooks::{EpochHooks, GovHooks};
pub use keeper::RewardKeeper;
pub use queries::{Page, PageRequest, PageResponse, RewardProgramQueryType};
pub use settlement::{calculate_claim_period_rewards, calculate_participant_reward};
