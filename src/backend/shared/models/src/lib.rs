//! Chain primitives shared by backend services.
//!
//! These types mirror what the host chain hands to its modules: coins in a
//! single denomination, fixed-point decimals, bech32 account and validator
//! addresses, the block header and the ordered ABCI event log.

pub mod address;
pub mod block;
pub mod coin;
pub mod dec;
pub mod errors;
pub mod event;

pub use address::{AccAddress, ValAddress, ACCOUNT_ADDRESS_PREFIX, VALIDATOR_ADDRESS_PREFIX};
pub use block::BlockHeader;
pub use coin::Coin;
pub use dec::Dec;
pub use errors::{AddressError, CoinError, DecError};
pub use event::{AbciEvent, EventAttribute};
