//! Constants used in the deploy scripts

use std::time::Duration;

/// Default RPC endpoint, a local hardhat node
pub const DEFAULT_RPC: &str = "http://127.0.0.1:8545";

/// Default Etherscan API endpoint (v2, multichain through the `chainid` param)
pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// File where the deployed addresses are recorded
pub const DEFAULT_OUTPUT_FILE: &str = "deployed.json";

/// Hardhat artifacts directory, relative to the project root
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Seconds to wait after the last deployment so the explorer can index the contracts
pub const DEFAULT_VERIFICATION_DELAY_SECS: u64 = 30;

/// How long a creation transaction may stay unmined before the deployment is given up
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Interval between two verification status checks
pub const VERIFICATION_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Status checks before giving up on a pending verification
pub const MAX_VERIFICATION_POLLS: u32 = 20;

/// Solidity standard json input, the only code format we submit
pub const SOLIDITY_STANDARD_JSON_INPUT: &str = "solidity-standard-json-input";
