//! Contract deployment

use alloy::primitives::{Address, TxHash};

use crate::{
    contracts::{CryptoDevsContract, DeployedContract},
    errors::ScriptError,
};

/// Deployer over an RPC endpoint
mod deployer;

pub use deployer::RpcDeployer;

/// A deployment transaction sent but not confirmed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Contract being deployed
    pub contract: CryptoDevsContract,
    /// Hash of the creation transaction
    pub tx_hash: TxHash,
    /// Address the contract is expected at, from the deployer nonce
    pub expected_address: Address,
    /// Constructor arguments the contract was deployed with
    pub constructor_args: Vec<Address>,
}

/// Something able to publish contracts on chain
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Send the creation transaction of `contract` with the given constructor arguments
    async fn deploy(
        &self,
        contract: CryptoDevsContract,
        constructor_args: Vec<Address>,
    ) -> Result<PendingDeployment, ScriptError>;

    /// Wait until the creation transaction is mined, returning the deployed contract
    async fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> Result<DeployedContract, ScriptError>;
}
