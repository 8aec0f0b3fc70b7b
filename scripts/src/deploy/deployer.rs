//! Deployment through an alloy provider

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::Address,
    providers::{PendingTransactionBuilder, Provider, WalletProvider},
    rpc::types::eth::TransactionRequest,
};
use ethers::{types::H160, utils::get_contract_address};
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactStore,
    constants::CONFIRMATION_TIMEOUT,
    contracts::{CryptoDevsContract, DeployedContract},
    deploy::{ContractDeployer, PendingDeployment},
    errors::ScriptError,
    tx::{abi::build_deploy_code, client::RpcProvider},
};

/// Deploys the hardhat compiled contracts through our RPC provider
pub struct RpcDeployer {
    /// Signing client the creation transactions go through
    client: RpcProvider,
    /// Where the contract bytecode is read from
    artifacts: ArtifactStore,
    /// How long to wait for a creation transaction to be mined
    confirmation_timeout: Duration,
}

impl RpcDeployer {
    /// Deployer reading its contracts from `artifacts`
    pub fn new(client: RpcProvider, artifacts: ArtifactStore) -> Self {
        RpcDeployer {
            client,
            artifacts,
            confirmation_timeout: CONFIRMATION_TIMEOUT,
        }
    }

    /// Override how long a creation transaction may stay unmined
    pub fn with_confirmation_timeout(mut self, confirmation_timeout: Duration) -> Self {
        self.confirmation_timeout = confirmation_timeout;
        self
    }

    /// Predict the address of the next contract created by our signer
    async fn predict_contract_address(&self) -> Result<Address, ScriptError> {
        let signer = self.client.default_signer_address();

        let signer_nonce = self
            .client
            .get_transaction_count(signer)
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

        Ok(contract_address_for(signer, signer_nonce))
    }
}

impl ContractDeployer for RpcDeployer {
    async fn deploy(
        &self,
        contract: CryptoDevsContract,
        constructor_args: Vec<Address>,
    ) -> Result<PendingDeployment, ScriptError> {
        let name = contract.artifact_name();
        let artifact = self.artifacts.load_artifact(name)?;

        let expected_address = self.predict_contract_address().await?;
        info!("Deploying {} to expected address {}", name, expected_address);

        // Build the creation tx
        let tx_request = TransactionRequest::default()
            .with_deploy_code(build_deploy_code(&artifact.bytecode, &constructor_args));

        // Send it
        let pending_tx = self
            .client
            .send_transaction(tx_request)
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{name}: {e}")))?;
        let tx_hash = *pending_tx.tx_hash();
        info!("Pending {} deploy transaction... {}", name, tx_hash);

        Ok(PendingDeployment {
            contract,
            tx_hash,
            expected_address,
            constructor_args,
        })
    }

    async fn wait_for_deployment(
        &self,
        pending: PendingDeployment,
    ) -> Result<DeployedContract, ScriptError> {
        let name = pending.contract.artifact_name();

        // Wait for the transaction to be included.
        let receipt = PendingTransactionBuilder::new(self.client.root(), pending.tx_hash)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{name}: {e}")))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "{name}: creation tx {} reverted",
                pending.tx_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{name}: receipt of {} holds no contract address",
                pending.tx_hash
            ))
        })?;
        if address != pending.expected_address {
            warn!(
                "{} deployed to {} instead of the expected {}",
                name, address, pending.expected_address
            );
        }
        info!("{} confirmed on block: {:?}", name, receipt.block_number);

        Ok(DeployedContract {
            contract: pending.contract,
            address,
            constructor_args: pending.constructor_args,
        })
    }
}

/// Address of the contract created by `deployer` at `nonce`, `keccak(rlp([deployer, nonce]))`
pub fn contract_address_for(deployer: Address, nonce: u64) -> Address {
    let predicted = get_contract_address(H160::from_slice(deployer.as_slice()), nonce);
    Address::from_slice(predicted.as_bytes())
}
