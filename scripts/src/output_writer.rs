//! The json record of the deployed contracts

use std::{fs, path::Path};

use alloy::primitives::Address;
use json::JsonValue;

use crate::{contracts::DeployedSuite, errors::ScriptError};

/// Where a value lives in the deployment record
pub enum OutputKeys {
    /// Address a contract got deployed at
    Deployment {
        /// Key of the contract
        key: &'static str,
    },
    /// Whether the contract got verified on the explorer
    Verification {
        /// Key of the contract
        key: &'static str,
    },
}

/// Read a deployed address
pub fn read_deployed_address(file_path: &Path, key: &'static str) -> Result<Address, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(format!(
            "Deployed addresses file {} not found",
            file_path.display()
        )));
    }

    // Parse it's json content into objects
    let parsed_json = get_json_from_file(file_path)?;

    let raw = parsed_json[key]["deploy"].as_str().ok_or_else(|| {
        ScriptError::JsonOutputError(format!("no deployed address recorded for {key}"))
    })?;
    raw.parse::<Address>()
        .map_err(|e| ScriptError::JsonOutputError(format!("{key}: {e}")))
}

/// Read the whole suite back from the deployment record
pub fn read_deployed_suite(file_path: &Path) -> Result<DeployedSuite, ScriptError> {
    Ok(DeployedSuite::from_addresses(
        read_deployed_address(file_path, "nft")?,
        read_deployed_address(file_path, "marketplace")?,
        read_deployed_address(file_path, "dao")?,
    ))
}

/// Writes the given value in the deployment record, creating it if needed
pub fn write_output_file(
    file_path: &Path,
    key: OutputKeys,
    value: impl Into<JsonValue>,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    let mut parsed_json = get_json_from_file(file_path)?;

    // Update the right key
    match key {
        OutputKeys::Deployment { key } => parsed_json[key]["deploy"] = value.into(),
        OutputKeys::Verification { key } => parsed_json[key]["verified"] = value.into(),
    };

    // Write the updated json back to the file
    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Record the addresses of a freshly deployed suite
pub fn write_deployed_suite(file_path: &Path, suite: &DeployedSuite) -> Result<(), ScriptError> {
    for deployed in suite.contracts() {
        write_output_file(
            file_path,
            OutputKeys::Deployment {
                key: deployed.contract.output_key(),
            },
            deployed.address.to_string(),
        )?;
        // A new deployment is never verified yet
        write_output_file(
            file_path,
            OutputKeys::Verification {
                key: deployed.contract.output_key(),
            },
            false,
        )?;
    }

    Ok(())
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn suite_survives_a_write_read_cycle() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("deployed.json");
        let suite = DeployedSuite::from_addresses(
            Address::repeat_byte(0xAA),
            Address::repeat_byte(0xBB),
            Address::repeat_byte(0xCC),
        );

        write_deployed_suite(&file, &suite).unwrap();

        assert_eq!(read_deployed_suite(&file).unwrap(), suite);
    }

    #[test]
    fn verification_flag_is_kept_next_to_the_address() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("deployed.json");
        write_output_file(
            &file,
            OutputKeys::Deployment { key: "nft" },
            Address::repeat_byte(0xAA).to_string(),
        )
        .unwrap();
        write_output_file(&file, OutputKeys::Verification { key: "nft" }, true).unwrap();

        let parsed = get_json_from_file(&file).unwrap();
        assert_eq!(parsed["nft"]["verified"], true);
        assert_eq!(
            read_deployed_address(&file, "nft").unwrap(),
            Address::repeat_byte(0xAA)
        );
    }

    #[test]
    fn missing_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_deployed_suite(&dir.path().join("deployed.json")).unwrap_err();

        assert!(matches!(err, ScriptError::JsonOutputError(_)));
    }

    #[test]
    fn missing_contract_in_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("deployed.json");
        write_output_file(
            &file,
            OutputKeys::Deployment { key: "nft" },
            Address::repeat_byte(0xAA).to_string(),
        )
        .unwrap();

        assert!(read_deployed_suite(&file).is_err());
    }
}
