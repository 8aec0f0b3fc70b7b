//! Compilation through the hardhat toolchain

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{errors::ScriptError, utils::command_success_or};

/// Config file names hardhat looks for, in its own order
const HARDHAT_CONFIG_FILES: [&str; 4] = [
    "hardhat.config.ts",
    "hardhat.config.cts",
    "hardhat.config.js",
    "hardhat.config.cjs",
];

/// Find the hardhat config of the project at `project_root`
pub fn find_hardhat_config(project_root: &Path) -> Option<PathBuf> {
    HARDHAT_CONFIG_FILES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Compile the contracts of the hardhat project at `project_root`, refreshing its artifacts
pub fn compile_contracts(project_root: &Path) -> Result<(), ScriptError> {
    if find_hardhat_config(project_root).is_none() {
        return Err(ScriptError::ContractCompilation(format!(
            "no hardhat config found in {}",
            project_root.display()
        )));
    }

    let mut compile_cmd = Command::new("npx");
    compile_cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    // Run from the project root so hardhat picks up its config
    compile_cmd.current_dir(project_root);
    compile_cmd.args("hardhat compile".split_whitespace());

    command_success_or(compile_cmd, "Failed to compile the hardhat contracts")
}
