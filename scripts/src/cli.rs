//! Definitions of CLI arguments and commands for deploy scripts

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    build::hardhat::compile_contracts,
    commands::{deploy_and_verify, verify_suite},
    constants::{
        ARTIFACTS_DIR, DEFAULT_ETHERSCAN_API_URL, DEFAULT_OUTPUT_FILE, DEFAULT_RPC,
        DEFAULT_VERIFICATION_DELAY_SECS,
    },
    deploy::RpcDeployer,
    errors::ScriptError,
    output_writer::read_deployed_suite,
    tx::client::create_rpc_provider,
    verify::EtherscanVerifier,
};

/// Scripts for deploying & verifying the CryptoDevs NFT, marketplace and DAO contracts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC)]
    pub rpc_url: String,

    /// Etherscan API key, used for the verification
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: String,

    /// Etherscan compatible API endpoint
    #[arg(long, env = "ETHERSCAN_API_URL", default_value = DEFAULT_ETHERSCAN_API_URL)]
    pub etherscan_api_url: String,

    /// Root of the hardhat project holding the contracts
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// File the deployed addresses are recorded in
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// The command to run, deploying everything by default
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy all the contracts, then verify them
    Deploy(DeployArgs),
    /// Verify the contracts recorded in the output file
    Verify,
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployArgs {
    /// Seconds to wait for the explorer to index the contracts before verifying them
    #[arg(long, default_value_t = DEFAULT_VERIFICATION_DELAY_SECS)]
    pub verification_delay: u64,

    /// Use the existing artifacts instead of compiling the contracts first
    #[arg(long)]
    pub skip_compile: bool,
}

impl Default for DeployArgs {
    fn default() -> Self {
        DeployArgs {
            verification_delay: DEFAULT_VERIFICATION_DELAY_SECS,
            skip_compile: false,
        }
    }
}

impl Cli {
    /// Run the command
    pub async fn run(self) -> Result<(), ScriptError> {
        // Build our RPC client with signer
        let (client, chain_id) = create_rpc_provider(&self.rpc_url, &self.priv_key).await?;

        let artifacts = ArtifactStore::new(self.project_root.join(ARTIFACTS_DIR));
        let verifier = EtherscanVerifier::new(
            self.etherscan_api_url.as_str(),
            self.etherscan_api_key.as_str(),
            chain_id,
            artifacts.clone(),
        );

        match self.command.unwrap_or(Command::Deploy(DeployArgs::default())) {
            Command::Deploy(args) => {
                if !args.skip_compile {
                    info!("Compiling contracts...");
                    compile_contracts(&self.project_root)?;
                }

                info!("Deploying contracts...");
                let deployer = RpcDeployer::new(client, artifacts);
                deploy_and_verify(
                    &deployer,
                    &verifier,
                    Duration::from_secs(args.verification_delay),
                    Some(self.output.as_path()),
                )
                .await?;

                Ok(())
            }
            Command::Verify => {
                info!("Verifying contracts from {}...", self.output.display());
                let suite = read_deployed_suite(&self.output)?;
                verify_suite(&verifier, &suite, Some(self.output.as_path())).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_full_deploy() {
        let cli = Cli::try_parse_from([
            "crypto-devs-scripts",
            "--priv-key",
            "0x01",
            "--etherscan-api-key",
            "key",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
    }

    #[test]
    fn deploy_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "crypto-devs-scripts",
            "--priv-key",
            "0x01",
            "--etherscan-api-key",
            "key",
            "deploy",
            "--verification-delay",
            "5",
            "--skip-compile",
        ])
        .unwrap();

        let Some(Command::Deploy(args)) = cli.command else {
            panic!("expected the deploy command");
        };
        assert_eq!(args.verification_delay, 5);
        assert!(args.skip_compile);
    }

    #[test]
    fn default_deploy_waits_thirty_seconds() {
        let args = DeployArgs::default();

        assert_eq!(args.verification_delay, 30);
        assert!(!args.skip_compile);
    }
}
