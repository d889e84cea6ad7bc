//! Store key layout. Ids are big-endian so prefix scans come back in id
//! order; addresses carry a one byte length prefix.

use shared_models::AccAddress;

use crate::utils::{Result, RewardError};

pub const REWARD_PROGRAM_KEY_PREFIX: u8 = 0x01;
pub const REWARD_PROGRAM_ID_KEY: u8 = 0x02;
pub const CLAIM_PERIOD_REWARD_DISTRIBUTION_KEY_PREFIX: u8 = 0x03;
pub const ACCOUNT_STATE_ADDRESS_LOOKUP_KEY_PREFIX: u8 = 0x04;
pub const ACCOUNT_STATE_KEY_PREFIX: u8 = 0x05;
pub const PROPOSAL_STATUS_KEY_PREFIX: u8 = 0x06;

pub const ID_LENGTH: usize = 8;

fn key_with_ids(prefix: u8, ids: &[u64]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + ids.len() * ID_LENGTH);
    key.push(prefix);
    for id in ids {
        key.extend_from_slice(&id.to_be_bytes());
    }
    key
}

pub fn reward_program_key(id: u64) -> Vec<u8> {
    key_with_ids(REWARD_PROGRAM_KEY_PREFIX, &[id])
}

pub fn reward_program_prefix() -> Vec<u8> {
    vec![REWARD_PROGRAM_KEY_PREFIX]
}

pub fn reward_program_id_key() -> Vec<u8> {
    vec![REWARD_PROGRAM_ID_KEY]
}

/// Distribution records are keyed program first so one program's periods
/// scan together.
pub fn claim_period_reward_distribution_key(claim_period_id: u64, reward_program_id: u64) -> Vec<u8> {
    key_with_ids(CLAIM_PERIOD_REWARD_DISTRIBUTION_KEY_PREFIX, &[reward_program_id, claim_period_id])
}

pub fn claim_period_reward_distribution_program_prefix(reward_program_id: u64) -> Vec<u8> {
    key_with_ids(CLAIM_PERIOD_REWARD_DISTRIBUTION_KEY_PREFIX, &[reward_program_id])
}

pub fn claim_period_reward_distribution_prefix() -> Vec<u8> {
    vec![CLAIM_PERIOD_REWARD_DISTRIBUTION_KEY_PREFIX]
}

pub fn reward_account_state_key(reward_program_id: u64, claim_period_id: u64, address: &AccAddress) -> Vec<u8> {
    let mut key = key_with_ids(ACCOUNT_STATE_KEY_PREFIX, &[reward_program_id, claim_period_id]);
    key.extend_from_slice(&address.length_prefixed());
    key
}

pub fn reward_account_state_claim_period_prefix(reward_program_id: u64, claim_period_id: u64) -> Vec<u8> {
    key_with_ids(ACCOUNT_STATE_KEY_PREFIX, &[reward_program_id, claim_period_id])
}

pub fn reward_account_state_program_prefix(reward_program_id: u64) -> Vec<u8> {
    key_with_ids(ACCOUNT_STATE_KEY_PREFIX, &[reward_program_id])
}

pub fn reward_account_state_prefix() -> Vec<u8> {
    vec![ACCOUNT_STATE_KEY_PREFIX]
}

pub fn account_state_address_lookup_key(address: &AccAddress, reward_program_id: u64, claim_period_id: u64) -> Vec<u8> {
    let mut key = account_state_address_lookup_prefix(address);
    key.extend_from_slice(&reward_program_id.to_be_bytes());
    key.extend_from_slice(&claim_period_id.to_be_bytes());
    key
}

pub fn account_state_address_lookup_prefix(address: &AccAddress) -> Vec<u8> {
    let mut key = vec![ACCOUNT_STATE_ADDRESS_LOOKUP_KEY_PREFIX];
    key.extend_from_slice(&address.length_prefixed());
    key
}

pub fn account_state_address_lookup_program_prefix(address: &AccAddress, reward_program_id: u64) -> Vec<u8> {
    let mut key = account_state_address_lookup_prefix(address);
    key.extend_from_slice(&reward_program_id.to_be_bytes());
    key
}

pub fn proposal_status_key(proposal_id: u64) -> Vec<u8> {
    key_with_ids(PROPOSAL_STATUS_KEY_PREFIX, &[proposal_id])
}

pub fn read_id(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; ID_LENGTH] = bytes
        .get(..ID_LENGTH)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| RewardError::NotFound(format!("id needs {ID_LENGTH} bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

/// `(reward program id, claim period id)` of an address lookup key.
pub fn parse_account_state_address_lookup_key(key: &[u8], address: &AccAddress) -> Result<(u64, u64)> {
    let prefix_len = 1 + address.length_prefixed().len();
    let ids = key
        .get(prefix_len..)
        .filter(|ids| ids.len() == 2 * ID_LENGTH)
        .ok_or_else(|| RewardError::NotFound(format!("malformed account state lookup key of {} bytes", key.len())))?;
    Ok((read_id(&ids[..ID_LENGTH])?, read_id(&ids[ID_LENGTH..])?))
}
