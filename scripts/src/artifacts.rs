//! Access to the hardhat compilation output.
//!
//! For a contract `Name`, hardhat writes `artifacts/<source path>/Name.json` holding the
//! bytecode, and a sibling `Name.dbg.json` pointing at the build info file that holds the
//! compiler version and the standard json input used for the verification.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{hex, primitives::Bytes};
use json::JsonValue;

use crate::errors::ScriptError;

/// A compiled contract, as read from its artifact
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// Name of the contract
    pub contract_name: String,
    /// Path of the solidity source, as known by the compiler (`contracts/Foo.sol`)
    pub source_name: String,
    /// Creation bytecode
    pub bytecode: Bytes,
    /// Path of the artifact file
    pub path: PathBuf,
}

impl ContractArtifact {
    /// Fully qualified name, as expected by the explorers (`contracts/Foo.sol:Foo`)
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

/// What the explorer needs to rebuild the contract
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Full solc version, e.g. `0.8.19+commit.7dd6d404`
    pub solc_long_version: String,
    /// Standard json input given to solc
    pub input: JsonValue,
}

/// Reader over a hardhat `artifacts` directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The `artifacts` directory itself
    root: PathBuf,
}

impl ArtifactStore {
    /// Store reading the artifacts under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactStore { root: root.into() }
    }

    /// Load the artifact of the contract named `contract_name`
    pub fn load_artifact(&self, contract_name: &str) -> Result<ContractArtifact, ScriptError> {
        let path = find_artifact_file(&self.root, &format!("{contract_name}.json"))?
            .ok_or_else(|| {
                ScriptError::ArtifactLoading(format!(
                    "no artifact found for {contract_name} in {}",
                    self.root.display()
                ))
            })?;
        let parsed = read_json(&path)?;

        let source_name = required_str(&parsed, "sourceName", &path)?;
        let raw_bytecode = required_str(&parsed, "bytecode", &path)?;
        if raw_bytecode.contains("__$") {
            return Err(ScriptError::ArtifactLoading(format!(
                "{contract_name} bytecode has unlinked libraries"
            )));
        }
        let bytecode = hex::decode(raw_bytecode)
            .map_err(|e| ScriptError::ArtifactLoading(format!("{contract_name}: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactLoading(format!(
                "{contract_name} has no bytecode, is it abstract?"
            )));
        }

        Ok(ContractArtifact {
            contract_name: contract_name.to_string(),
            source_name,
            bytecode: bytecode.into(),
            path,
        })
    }

    /// Load the build info the given artifact was compiled from
    pub fn load_build_info(&self, artifact: &ContractArtifact) -> Result<BuildInfo, ScriptError> {
        let dbg_path = artifact.path.with_extension("dbg.json");
        let dbg = read_json(&dbg_path)?;
        let build_info_ref = required_str(&dbg, "buildInfo", &dbg_path)?;

        // The reference is relative to the directory of the dbg file
        let build_info_path = dbg_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(build_info_ref);
        let mut build_info = read_json(&build_info_path)?;

        let solc_long_version = required_str(&build_info, "solcLongVersion", &build_info_path)?;
        let input = build_info.remove("input");
        if input.is_null() {
            return Err(ScriptError::ArtifactLoading(format!(
                "missing compiler input in {}",
                build_info_path.display()
            )));
        }

        Ok(BuildInfo {
            solc_long_version,
            input,
        })
    }
}

/// Walk `dir` looking for a file named exactly `file_name`
fn find_artifact_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactLoading(e.to_string()))?
            .path();
        if path.is_dir() {
            // build-info only holds compiler runs, never artifacts
            if path.file_name().is_some_and(|name| name == "build-info") {
                continue;
            }
            if let Some(found) = find_artifact_file(&path, file_name)? {
                return Ok(Some(found));
            }
        } else if path.file_name().is_some_and(|name| name == file_name) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Parses the JSON file at the given path
fn read_json(path: &Path) -> Result<JsonValue, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", path.display())))?;
    json::parse(&contents)
        .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", path.display())))
}

/// Read a mandatory string field
fn required_str(value: &JsonValue, key: &str, path: &Path) -> Result<String, ScriptError> {
    value[key].as_str().map(str::to_string).ok_or_else(|| {
        ScriptError::ArtifactLoading(format!("missing `{key}` in {}", path.display()))
    })
}
