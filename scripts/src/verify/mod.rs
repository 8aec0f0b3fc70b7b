//! Contract verification on a block explorer

use alloy::primitives::Address;

use crate::{contracts::CryptoDevsContract, errors::ScriptError};

/// Etherscan API client
mod etherscan;

pub use etherscan::EtherscanVerifier;

/// Something able to match a deployed contract against its source
#[allow(async_fn_in_trait)]
pub trait ContractVerifier {
    /// Verify `contract` deployed at `address` with the given constructor arguments
    async fn verify(
        &self,
        contract: CryptoDevsContract,
        address: Address,
        constructor_args: &[Address],
    ) -> Result<(), ScriptError>;
}
