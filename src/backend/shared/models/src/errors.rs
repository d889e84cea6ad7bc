use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address string is not allowed")]
    Empty,

    #[error("decoding bech32 failed: {0}")]
    Decode(String),

    #[error("encoding bech32 failed: {0}")]
    Encode(String),

    #[error("invalid bech32 prefix; expected {expected}, got {found}")]
    WrongPrefix { expected: String, found: String },

    #[error("address length must be between 1 and 255 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("coin denoms differ {0} : {1}")]
    DenomMismatch(String, String),

    #[error("coin amount overflow")]
    Overflow,

    #[error("insufficient amount: {0} is smaller than {1}")]
    Insufficient(String, String),

    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("invalid coin expression: {0}")]
    Parse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("decimal overflow")]
    Overflow,

    #[error("invalid decimal string: {0}")]
    Parse(String),
}
