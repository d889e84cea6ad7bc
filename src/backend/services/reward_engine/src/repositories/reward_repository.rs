use serde::{de::DeserializeOwned, Serialize};
use shared_models::AccAddress;

use crate::models::{
    ClaimPeriodRewardDistribution, ClaimStatus, ProgramState, ProposalStatus, RewardAccountState, RewardProgram,
};
use crate::repositories::keys;
use crate::repositories::traits::KvStore;
use crate::utils::Result;

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

fn decode_all<T: DeserializeOwned>(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Result<Vec<T>> {
    entries.iter().map(|(_, value)| decode(value)).collect()
}

/// Typed access to the engine's records. Implemented for every [`KvStore`],
/// so cached and committed stores share one code path.
pub trait RewardRepository {
    fn get_reward_program(&self, id: u64) -> Result<Option<RewardProgram>>;
    fn set_reward_program(&mut self, program: &RewardProgram) -> Result<()>;
    fn get_all_reward_programs(&self) -> Result<Vec<RewardProgram>>;
    /// Pending and Started programs, in id order.
    fn get_unexpired_reward_programs(&self) -> Result<Vec<RewardProgram>>;
    fn get_reward_programs_in_state(&self, state: ProgramState) -> Result<Vec<RewardProgram>>;

    /// Id the next created program receives.
    fn get_reward_program_id(&self) -> Result<u64>;
    fn set_reward_program_id(&mut self, id: u64);

    fn get_claim_period_reward_distribution(
        &self,
        claim_period_id: u64,
        reward_program_id: u64,
    ) -> Result<Option<ClaimPeriodRewardDistribution>>;
    fn set_claim_period_reward_distribution(&mut self, distribution: &ClaimPeriodRewardDistribution) -> Result<()>;
    fn get_all_claim_period_reward_distributions(&self) -> Result<Vec<ClaimPeriodRewardDistribution>>;
    fn get_claim_period_reward_distributions_for_program(
        &self,
        reward_program_id: u64,
    ) -> Result<Vec<ClaimPeriodRewardDistribution>>;

    fn get_reward_account_state(
        &self,
        reward_program_id: u64,
        claim_period_id: u64,
        address: &AccAddress,
    ) -> Result<Option<RewardAccountState>>;
    /// Writes the state and its by-address index entry.
    fn set_reward_account_state(&mut self, state: &RewardAccountState) -> Result<()>;
    fn get_reward_account_states_for_claim_period(
        &self,
        reward_program_id: u64,
        claim_period_id: u64,
    ) -> Result<Vec<RewardAccountState>>;
    fn get_reward_account_states_for_program(&self, reward_program_id: u64) -> Result<Vec<RewardAccountState>>;
    fn get_all_reward_account_states(&self) -> Result<Vec<RewardAccountState>>;
    fn get_reward_account_states_by_address(&self, address: &AccAddress) -> Result<Vec<RewardAccountState>>;
    fn get_reward_account_states_by_address_and_program(
        &self,
        address: &AccAddress,
        reward_program_id: u64,
    ) -> Result<Vec<RewardAccountState>>;

    /// Flip every Unclaimable state of the period to Claimable.
    fn make_reward_claims_claimable_for_period(&mut self, reward_program_id: u64, claim_period_id: u64) -> Result<()>;
    /// Flip every state of the program that is not Claimed to Expired and
    /// return the states that changed.
    fn expire_reward_claims_for_program(&mut self, reward_program_id: u64) -> Result<Vec<RewardAccountState>>;

    /// Delete the program with its distributions, account states and index entries.
    fn remove_reward_program_records(&mut self, reward_program_id: u64) -> Result<()>;

    fn get_proposal_status(&self, proposal_id: u64) -> Result<Option<ProposalStatus>>;
    fn set_proposal_status(&mut self, proposal_id: u64, status: ProposalStatus) -> Result<()>;
}

impl<T: KvStore + ?Sized> RewardRepository for T {
    fn get_reward_program(&self, id: u64) -> Result<Option<RewardProgram>> {
        self.get(&keys::reward_program_key(id)).map(|bytes| decode(&bytes)).transpose()
    }

    fn set_reward_program(&mut self, program: &RewardProgram) -> Result<()> {
        let value = encode(program)?;
        self.set(&keys::reward_program_key(program.id), value);
        Ok(())
    }

    fn get_all_reward_programs(&self) -> Result<Vec<RewardProgram>> {
        decode_all(self.prefix_scan(&keys::reward_program_prefix()))
    }

    fn get_unexpired_reward_programs(&self) -> Result<Vec<RewardProgram>> {
        Ok(self
            .get_all_reward_programs()?
            .into_iter()
            .filter(|program| matches!(program.state, ProgramState::Pending | ProgramState::Started))
            .collect())
    }

    fn get_reward_programs_in_state(&self, state: ProgramState) -> Result<Vec<RewardProgram>> {
        Ok(self
            .get_all_reward_programs()?
            .into_iter()
            .filter(|program| program.state == state)
            .collect())
    }

    fn get_reward_program_id(&self) -> Result<u64> {
        match self.get(&keys::reward_program_id_key()) {
            Some(bytes) => keys::read_id(&bytes),
            None => Ok(1),
        }
    }

    fn set_reward_program_id(&mut self, id: u64) {
        self.set(&keys::reward_program_id_key(), id.to_be_bytes().to_vec());
    }

    fn get_claim_period_reward_distribution(
        &self,
        claim_period_id: u64,
        reward_program_id: u64,
    ) -> Result<Option<ClaimPeriodRewardDistribution>> {
        self.get(&keys::claim_period_reward_distribution_key(claim_period_id, reward_program_id))
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn set_claim_period_reward_distribution(&mut self, distribution: &ClaimPeriodRewardDistribution) -> Result<()> {
        let value = encode(distribution)?;
        self.set(
            &keys::claim_period_reward_distribution_key(distribution.claim_period_id, distribution.reward_program_id),
            value,
        );
        Ok(())
    }

    fn get_all_claim_period_reward_distributions(&self) -> Result<Vec<ClaimPeriodRewardDistribution>> {
        decode_all(self.prefix_scan(&keys::claim_period_reward_distribution_prefix()))
    }

    fn get_claim_period_reward_distributions_for_program(
        &self,
        reward_program_id: u64,
    ) -> Result<Vec<ClaimPeriodRewardDistribution>> {
        decode_all(self.prefix_scan(&keys::claim_period_reward_distribution_program_prefix(reward_program_id)))
    }

    fn get_reward_account_state(
        &self,
        reward_program_id: u64,
        claim_period_id: u64,
        address: &AccAddress,
    ) -> Result<Option<RewardAccountState>> {
        self.get(&keys::reward_account_state_key(reward_program_id, claim_period_id, address))
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn set_reward_account_state(&mut self, state: &RewardAccountState) -> Result<()> {
        let value = encode(state)?;
        self.set(
            &keys::reward_account_state_key(state.reward_program_id, state.claim_period_id, &state.address),
            value,
        );
        self.set(
            &keys::account_state_address_lookup_key(&state.address, state.reward_program_id, state.claim_period_id),
            Vec::new(),
        );
        Ok(())
    }

    fn get_reward_account_states_for_claim_period(
        &self,
        reward_program_id: u64,
        claim_period_id: u64,
    ) -> Result<Vec<RewardAccountState>> {
        decode_all(self.prefix_scan(&keys::reward_account_state_claim_period_prefix(
            reward_program_id,
            claim_period_id,
        )))
    }

    fn get_reward_account_states_for_program(&self, reward_program_id: u64) -> Result<Vec<RewardAccountState>> {
        decode_all(self.prefix_scan(&keys::reward_account_state_program_prefix(reward_program_id)))
    }

    fn get_all_reward_account_states(&self) -> Result<Vec<RewardAccountState>> {
        decode_all(self.prefix_scan(&keys::reward_account_state_prefix()))
    }

    fn get_reward_account_states_by_address(&self, address: &AccAddress) -> Result<Vec<RewardAccountState>> {
        lookup_states(self, address, self.prefix_scan(&keys::account_state_address_lookup_prefix(address)))
    }

    fn get_reward_account_states_by_address_and_program(
        &self,
        address: &AccAddress,
        reward_program_id: u64,
    ) -> Result<Vec<RewardAccountState>> {
        lookup_states(
            self,
            address,
            self.prefix_scan(&keys::account_state_address_lookup_program_prefix(address, reward_program_id)),
        )
    }

    fn make_reward_claims_claimable_for_period(&mut self, reward_program_id: u64, claim_period_id: u64) -> Result<()> {
        for mut state in self.get_reward_account_states_for_claim_period(reward_program_id, claim_period_id)? {
            if state.claim_status == ClaimStatus::Unclaimable {
                state.claim_status = ClaimStatus::Claimable;
                self.set_reward_account_state(&state)?;
            }
        }
        Ok(())
    }

    fn expire_reward_claims_for_program(&mut self, reward_program_id: u64) -> Result<Vec<RewardAccountState>> {
        let mut expired = Vec::new();
        for mut state in self.get_reward_account_states_for_program(reward_program_id)? {
            if matches!(state.claim_status, ClaimStatus::Claimed | ClaimStatus::Expired) {
                continue;
            }
            state.claim_status = ClaimStatus::Expired;
            self.set_reward_account_state(&state)?;
            expired.push(state);
        }
        Ok(expired)
    }

    fn remove_reward_program_records(&mut self, reward_program_id: u64) -> Result<()> {
        for state in self.get_reward_account_states_for_program(reward_program_id)? {
            self.delete(&keys::account_state_address_lookup_key(
                &state.address,
                state.reward_program_id,
                state.claim_period_id,
            ));
        }

        let prefixes = [
            keys::reward_account_state_program_prefix(reward_program_id),
            keys::claim_period_reward_distribution_program_prefix(reward_program_id),
        ];
        for prefix in &prefixes {
            for (key, _) in self.prefix_scan(prefix) {
                self.delete(&key);
            }
        }

        self.delete(&keys::reward_program_key(reward_program_id));
        Ok(())
    }

    fn get_proposal_status(&self, proposal_id: u64) -> Result<Option<ProposalStatus>> {
        self.get(&keys::proposal_status_key(proposal_id))
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn set_proposal_status(&mut self, proposal_id: u64, status: ProposalStatus) -> Result<()> {
        let value = encode(&status)?;
        self.set(&keys::proposal_status_key(proposal_id), value);
        Ok(())
    }
}

fn lookup_states<T: KvStore + ?Sized>(
    store: &T,
    address: &AccAddress,
    index_entries: Vec<(Vec<u8>, Vec<u8>)>,
) -> Result<Vec<RewardAccountState>> {
    let mut states = Vec::with_capacity(index_entries.len());
    for (key, _) in index_entries {
        let (reward_program_id, claim_period_id) = keys::parse_account_state_address_lookup_key(&key, address)?;
        if let Some(state) = store.get_reward_account_state(reward_program_id, claim_period_id, address)? {
            states.push(state);
        }
    }
    Ok(states)
}
