use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DecError;

/// Number of fractional digits carried by [`Dec`].
pub const PRECISION: u32 = 18;

const ONE: u128 = 10u128.pow(PRECISION);

/// Unsigned fixed-point decimal with 18 fractional digits.
///
/// Used for ratios such as a validator's active-stake percentile, where
/// floating point would make results differ between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec(u128);

impl Dec {
    pub const fn zero() -> Self {
        Dec(0)
    }

    pub const fn one() -> Self {
        Dec(ONE)
    }

    pub fn from_int(value: u64) -> Self {
        Dec(value as u128 * ONE)
    }

    /// `numerator / denominator`, truncated to 18 fractional digits.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Result<Self, DecError> {
        if denominator == 0 {
            return Err(DecError::DivisionByZero);
        }
        let scaled = numerator.checked_mul(ONE).ok_or(DecError::Overflow)?;
        Ok(Dec(scaled / denominator))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / ONE, self.0 % ONE)
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || DecError::Parse(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
            return Err(parse_error());
        }
        if fraction.len() > PRECISION as usize {
            return Err(parse_error());
        }

        let whole = whole.parse::<u128>().map_err(|_| parse_error())?;
        let mut fractional = 0u128;
        if !fraction.is_empty() {
            let padding = PRECISION - fraction.len() as u32;
            fractional = fraction.parse::<u128>().map_err(|_| parse_error())? * 10u128.pow(padding);
        }

        whole
            .checked_mul(ONE)
            .and_then(|w| w.checked_add(fractional))
            .map(Dec)
            .ok_or(DecError::Overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(Dec::from_ratio(1, 2).unwrap(), "0.5".parse().unwrap());
        assert_eq!(Dec::from_ratio(1, 3).unwrap().to_string(), "0.333333333333333333");
        assert_eq!(Dec::from_ratio(1, 0), Err(DecError::DivisionByZero));
        assert_eq!(Dec::from_ratio(4, 4).unwrap(), Dec::one());
    }

    #[test]
    fn test_parse() {
        assert_eq!("1".parse::<Dec>().unwrap(), Dec::from_int(1));
        assert_eq!("0.25".parse::<Dec>().unwrap().to_string(), "0.250000000000000000");
        assert!("".parse::<Dec>().is_err());
        assert!(".5".parse::<Dec>().is_err());
        assert!("-1".parse::<Dec>().is_err());
        assert!("0.1234567890123456789".parse::<Dec>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Dec::zero() < Dec::from_ratio(1, 100).unwrap());
        assert!(Dec::from_ratio(99, 100).unwrap() < Dec::one());
    }
}
