use anyhow::Result;
use shared_models::{AccAddress, Coin, ValAddress};

use crate::models::{Delegation, Validator};

/// Ordered byte-keyed store the engine keeps its records in.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: &[u8], value: Vec<u8>);
    fn delete(&mut self, key: &[u8]);
    /// Every entry whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// Funds movement between accounts and the engine's module account.
pub trait BankKeeper: Send + Sync {
    fn spendable_coins(&self, address: &AccAddress) -> Vec<Coin>;
    fn send_coins_from_account_to_module(&self, sender: &AccAddress, module: &str, amount: &Coin) -> Result<()>;
    /// Moves every coin of `amounts` or none of them.
    fn send_coins_from_module_to_account(
        &self,
        module: &str,
        recipient: &AccAddress,
        amounts: &[Coin],
    ) -> Result<()>;
}

/// Read accessors into the staking module.
pub trait StakingKeeper: Send + Sync {
    fn get_validator(&self, address: &ValAddress) -> Option<Validator>;
    fn get_delegation(&self, delegator: &AccAddress, validator: &ValAddress) -> Option<Delegation>;
    fn get_all_delegator_delegations(&self, delegator: &AccAddress) -> Vec<Delegation>;
    /// Bonded validators, highest power first.
    fn get_bonded_validators_by_power(&self) -> Vec<Validator>;
}
