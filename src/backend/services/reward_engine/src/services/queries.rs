use serde::{Deserialize, Serialize};
use shared_models::AccAddress;

use crate::models::{ClaimPeriodRewardDistribution, ClaimStatus, ProgramState, RewardAccountResponse, RewardProgram};
use crate::repositories::{BankKeeper, KvStore, RewardRepository, StakingKeeper};
use crate::services::keeper::RewardKeeper;
use crate::services::settlement::calculate_participant_reward;
use crate::utils::{Result, RewardError};

/// Which programs a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardProgramQueryType {
    All,
    Pending,
    /// Started programs
    Active,
    /// Pending and Started programs
    Outstanding,
    /// Finished and Expired programs
    Finished,
    Expired,
}

impl RewardProgramQueryType {
    pub fn includes(self, state: ProgramState) -> bool {
        match self {
            RewardProgramQueryType::All => true,
            RewardProgramQueryType::Pending => state == ProgramState::Pending,
            RewardProgramQueryType::Active => state == ProgramState::Started,
            RewardProgramQueryType::Outstanding => matches!(state, ProgramState::Pending | ProgramState::Started),
            RewardProgramQueryType::Finished => matches!(state, ProgramState::Finished | ProgramState::Expired),
            RewardProgramQueryType::Expired => state == ProgramState::Expired,
        }
    }
}

/// Offset pagination. A zero or missing limit means the configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Matching records before paging
    pub total: usize,
    /// Offset of the next page, if there is one
    pub next_offset: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageResponse,
}

impl<B: BankKeeper, S: StakingKeeper> RewardKeeper<B, S> {
    fn page_limit(&self, page: &PageRequest) -> usize {
        match page.limit {
            Some(limit) if limit > 0 => limit.min(self.config().max_page_limit),
            _ => self.config().default_page_limit,
        }
    }

    fn paginate<T>(&self, records: Vec<T>, page: &PageRequest) -> Page<T> {
        let total = records.len();
        let limit = self.page_limit(page);
        let items: Vec<T> = records.into_iter().skip(page.offset).take(limit).collect();
        let end = page.offset.saturating_add(items.len());

        Page {
            items,
            pagination: PageResponse {
                total,
                next_offset: (end < total).then_some(end),
            },
        }
    }

    /// Programs of the requested kind, in id order.
    pub fn reward_programs<T: KvStore + ?Sized>(
        &self,
        store: &T,
        query_type: RewardProgramQueryType,
        page: &PageRequest,
    ) -> Result<Page<RewardProgram>> {
        let programs = store
            .get_all_reward_programs()?
            .into_iter()
            .filter(|program| query_type.includes(program.state))
            .collect();
        Ok(self.paginate(programs, page))
    }

    pub fn reward_program_by_id<T: KvStore + ?Sized>(&self, store: &T, id: u64) -> Result<RewardProgram> {
        store.get_reward_program(id)?.ok_or(RewardError::ProgramNotFound(id))
    }

    pub fn claim_period_reward_distributions<T: KvStore + ?Sized>(
        &self,
        store: &T,
        page: &PageRequest,
    ) -> Result<Page<ClaimPeriodRewardDistribution>> {
        Ok(self.paginate(store.get_all_claim_period_reward_distributions()?, page))
    }

    pub fn claim_period_reward_distribution_by_id<T: KvStore + ?Sized>(
        &self,
        store: &T,
        reward_program_id: u64,
        claim_period_id: u64,
    ) -> Result<ClaimPeriodRewardDistribution> {
        store
            .get_claim_period_reward_distribution(claim_period_id, reward_program_id)?
            .ok_or_else(|| {
                RewardError::NotFound(format!(
                    "claim period reward distribution {claim_period_id} of reward program {reward_program_id}"
                ))
            })
    }

    /// What `address` earned per program and claim period, optionally only in
    /// one claim status. Periods where it earned no shares are left out.
    pub fn reward_distributions_by_address<T: KvStore + ?Sized>(
        &self,
        store: &T,
        address: &AccAddress,
        claim_status: Option<ClaimStatus>,
        page: &PageRequest,
    ) -> Result<Page<RewardAccountResponse>> {
        let states: Vec<_> = store
            .get_reward_account_states_by_address(address)?
            .into_iter()
            .filter(|state| state.shares_earned > 0)
            .filter(|state| claim_status.map_or(true, |status| state.claim_status == status))
            .collect();

        let page = self.paginate(states, page);
        let mut items = Vec::with_capacity(page.items.len());
        for state in page.items {
            let Some(program) = store.get_reward_program(state.reward_program_id)? else {
                continue;
            };
            let Some(distribution) =
                store.get_claim_period_reward_distribution(state.claim_period_id, state.reward_program_id)?
            else {
                continue;
            };

            items.push(RewardAccountResponse {
                reward_program_id: state.reward_program_id,
                total_reward_claim: calculate_participant_reward(
                    state.shares_earned,
                    distribution.total_shares,
                    &distribution.rewards_pool,
                    &program.max_reward_by_address,
                )?,
                claim_status: state.claim_status,
                claim_id: state.claim_period_id,
            });
        }

        Ok(Page {
            items,
            pagination: page.pagination,
        })
    }
}
