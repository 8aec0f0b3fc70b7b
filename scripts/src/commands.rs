//! The deployment sequence of the CryptoDevs contracts

use std::{path::Path, time::Duration};

use alloy::primitives::Address;
use tokio::time::sleep;
use tracing::info;

use crate::{
    contracts::{dao_constructor_args, CryptoDevsContract, DeployedContract, DeployedSuite},
    deploy::ContractDeployer,
    errors::ScriptError,
    output_writer::{write_deployed_suite, write_output_file, OutputKeys},
    verify::ContractVerifier,
};

/// Deploy one contract and wait for it to be confirmed
async fn deploy_one<D: ContractDeployer>(
    deployer: &D,
    contract: CryptoDevsContract,
    constructor_args: Vec<Address>,
) -> Result<DeployedContract, ScriptError> {
    let pending = deployer.deploy(contract, constructor_args).await?;
    let deployed = deployer.wait_for_deployment(pending).await?;
    info!(
        "{} deployed to: {}",
        contract.artifact_name(),
        deployed.address
    );
    Ok(deployed)
}

/// Deploy the NFT, the marketplace, then the DAO wired to both of them
pub async fn deploy_suite<D: ContractDeployer>(deployer: &D) -> Result<DeployedSuite, ScriptError> {
    let nft = deploy_one(deployer, CryptoDevsContract::Nft, vec![]).await?;
    let marketplace = deploy_one(deployer, CryptoDevsContract::Marketplace, vec![]).await?;
    let dao = deploy_one(
        deployer,
        CryptoDevsContract::Dao,
        dao_constructor_args(marketplace.address, nft.address),
    )
    .await?;

    Ok(DeployedSuite {
        nft,
        marketplace,
        dao,
    })
}

/// Verify the three contracts, stopping at the first failure
pub async fn verify_suite<V: ContractVerifier>(
    verifier: &V,
    suite: &DeployedSuite,
    output_file: Option<&Path>,
) -> Result<(), ScriptError> {
    for deployed in suite.contracts() {
        verifier
            .verify(deployed.contract, deployed.address, &deployed.constructor_args)
            .await?;

        if let Some(file) = output_file {
            write_output_file(
                file,
                OutputKeys::Verification {
                    key: deployed.contract.output_key(),
                },
                true,
            )?;
        }
    }

    Ok(())
}

/// Full run: deploy everything, give the explorer `verification_delay` to index it, verify
pub async fn deploy_and_verify<D: ContractDeployer, V: ContractVerifier>(
    deployer: &D,
    verifier: &V,
    verification_delay: Duration,
    output_file: Option<&Path>,
) -> Result<DeployedSuite, ScriptError> {
    let suite = deploy_suite(deployer).await?;

    if let Some(file) = output_file {
        write_deployed_suite(file, &suite)?;
        info!("Deployed addresses written to {}", file.display());
    }

    // Let the explorer catch up with the deployments
    info!(
        "Waiting {}s before verifying the contracts...",
        verification_delay.as_secs()
    );
    sleep(verification_delay).await;

    verify_suite(verifier, &suite, output_file).await?;

    Ok(suite)
}
