use serde::{Deserialize, Serialize};
use shared_models::{AccAddress, ValAddress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

/// Read-only view of a validator as the staking module reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: ValAddress,
    pub status: BondStatus,
    pub jailed: bool,
    /// Bonded tokens, also used as the validator's voting power.
    pub tokens: u128,
    pub delegator_shares: u128,
}

impl Validator {
    /// Tokens backing `shares` of this validator, rounded down.
    pub fn tokens_from_shares(&self, shares: u128) -> u128 {
        if self.delegator_shares == 0 {
            return 0;
        }
        match shares.checked_mul(self.tokens) {
            Some(product) => product / self.delegator_shares,
            None => (shares / self.delegator_shares).saturating_mul(self.tokens),
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded && !self.jailed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    pub shares: u128,
}
