use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AddressError;

/// Human readable part of account addresses.
pub const ACCOUNT_ADDRESS_PREFIX: &str = "cosmos";

/// Human readable part of validator operator addresses.
pub const VALIDATOR_ADDRESS_PREFIX: &str = "cosmosvaloper";

/// Store keys prefix raw addresses with a single length byte.
pub const MAX_ADDRESS_LENGTH: usize = 255;

fn check_length(len: usize) -> Result<(), AddressError> {
    if len == 0 || len > MAX_ADDRESS_LENGTH {
        return Err(AddressError::InvalidLength(len));
    }
    Ok(())
}

fn decode(value: &str, expected_prefix: &str) -> Result<Vec<u8>, AddressError> {
    if value.trim().is_empty() {
        return Err(AddressError::Empty);
    }

    let (hrp, data) = bech32::decode(value).map_err(|e| AddressError::Decode(e.to_string()))?;
    let found = hrp.to_string();
    if !found.eq_ignore_ascii_case(expected_prefix) {
        return Err(AddressError::WrongPrefix {
            expected: expected_prefix.to_string(),
            found,
        });
    }

    check_length(data.len())?;
    Ok(data)
}

fn encode(prefix: &str, bytes: &[u8]) -> Result<String, AddressError> {
    let hrp = Hrp::parse(prefix).map_err(|e| AddressError::Encode(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, bytes).map_err(|e| AddressError::Encode(e.to_string()))
}

macro_rules! bech32_address {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw address bytes.
            pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AddressError> {
                let bytes = bytes.into();
                check_length(bytes.len())?;
                Ok(Self(bytes))
            }

            /// Parse a bech32 string carrying this address kind's prefix.
            pub fn from_bech32(value: &str) -> Result<Self, AddressError> {
                decode(value, $prefix).map(Self)
            }

            pub fn to_bech32(&self) -> Result<String, AddressError> {
                encode($prefix, &self.0)
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Raw bytes preceded by their length, for composite store keys.
            pub fn length_prefixed(&self) -> Vec<u8> {
                let mut out = Vec::with_capacity(self.0.len() + 1);
                // length is bounded by the constructors
                out.push(self.0.len() as u8);
                out.extend_from_slice(&self.0);
                out
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.to_bech32() {
                    Ok(encoded) => f.write_str(&encoded),
                    Err(_) => {
                        f.write_str($prefix)?;
                        for byte in &self.0 {
                            write!(f, "{byte:02x}")?;
                        }
                        Ok(())
                    }
                }
            }
        }

        impl FromStr for $name {
            type Err = AddressError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_bech32(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let encoded = self.to_bech32().map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&encoded)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let encoded = String::deserialize(deserializer)?;
                Self::from_bech32(&encoded).map_err(serde::de::Error::custom)
            }
        }
    };
}

bech32_address!(
    /// Account address, rendered with [`ACCOUNT_ADDRESS_PREFIX`].
    AccAddress,
    ACCOUNT_ADDRESS_PREFIX
);

bech32_address!(
    /// Validator operator address, rendered with [`VALIDATOR_ADDRESS_PREFIX`].
    ValAddress,
    VALIDATOR_ADDRESS_PREFIX
);

impl ValAddress {
    /// The account controlled by the same key as this operator.
    pub fn to_account(&self) -> AccAddress {
        AccAddress(self.0.clone())
    }
}

impl AccAddress {
    pub fn to_validator(&self) -> ValAddress {
        ValAddress(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_ACCOUNT: &str = "cosmos1v57fx2l2rt6ehujuu99u2fw05779m5e2ux4z2h";

    #[test]
    fn test_parse_known_account() {
        let address = AccAddress::from_bech32(KNOWN_ACCOUNT).unwrap();
        assert_eq!(address.as_bytes().len(), 20);
        assert_eq!(address.to_string(), KNOWN_ACCOUNT);
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        let validator = AccAddress::from_bech32(KNOWN_ACCOUNT).unwrap().to_validator();
        let encoded = validator.to_string();
        assert!(encoded.starts_with("cosmosvaloper1"));
        assert!(matches!(
            AccAddress::from_bech32(&encoded),
            Err(AddressError::WrongPrefix { .. })
        ));
        assert_eq!(ValAddress::from_bech32(&encoded).unwrap(), validator);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(AccAddress::from_bech32("  "), Err(AddressError::Empty));
        assert!(matches!(AccAddress::from_bech32("invalid"), Err(AddressError::Decode(_))));
        assert!(AccAddress::new(Vec::new()).is_err());
        assert!(AccAddress::new(vec![0u8; 256]).is_err());
    }

    #[test]
    fn test_length_prefixed() {
        let address = AccAddress::new(vec![7u8; 20]).unwrap();
        let key = address.length_prefixed();
        assert_eq!(key[0], 20);
        assert_eq!(&key[1..], address.as_bytes());
    }

    #[test]
    fn test_serde_uses_bech32() {
        let address = AccAddress::from_bech32(KNOWN_ACCOUNT).unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{KNOWN_ACCOUNT}\""));
        let decoded: AccAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, address);
    }
}
