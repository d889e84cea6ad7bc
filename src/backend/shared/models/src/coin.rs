use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoinError;

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    /// Encoded as a decimal string, like cosmos `sdk.Int`.
    #[serde(with = "amount_string")]
    pub amount: u128,
}

mod amount_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map_err(|_| D::Error::custom(format!("invalid coin amount: {raw}")))
    }
}

/// Denoms start with a letter and are 3 to 128 characters of
/// `[a-zA-Z0-9/:._-]`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let mut chars = denom.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));

    if !starts_with_letter || !valid_tail || denom.len() < 3 || denom.len() > 128 {
        return Err(CoinError::InvalidDenom(denom.to_string()));
    }
    Ok(())
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self { denom: denom.into(), amount }
    }

    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn validate(&self) -> Result<(), CoinError> {
        validate_denom(&self.denom)
    }

    fn ensure_same_denom(&self, other: &Coin) -> Result<(), CoinError> {
        if self.denom != other.denom {
            return Err(CoinError::DenomMismatch(self.denom.clone(), other.denom.clone()));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Coin) -> Result<Coin, CoinError> {
        self.ensure_same_denom(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or(CoinError::Overflow)?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    pub fn checked_sub(&self, other: &Coin) -> Result<Coin, CoinError> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| CoinError::Insufficient(self.to_string(), other.to_string()))?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Strictly smaller amount of the same denom.
    pub fn is_lt(&self, other: &Coin) -> Result<bool, CoinError> {
        self.ensure_same_denom(other)?;
        Ok(self.amount < other.amount)
    }

    /// The smaller of two same-denom coins.
    pub fn min(&self, other: &Coin) -> Result<Coin, CoinError> {
        Ok(if self.is_lt(other)? { self.clone() } else { other.clone() })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    /// Parses `"<amount><denom>"`, e.g. `"1000nhash"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinError::Parse(s.to_string()));
        }

        let amount = amount.parse::<u128>().map_err(|_| CoinError::Parse(s.to_string()))?;
        validate_denom(denom)?;
        Ok(Coin::new(denom, amount))
    }
}
