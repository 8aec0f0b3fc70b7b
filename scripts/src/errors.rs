//! Definitions of errors that can occur during the execution of the deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deployment scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error when reading or writing the deployment record
    JsonOutputError(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// Error when fetching the nonce to predict a deployment address
    NonceFetching(String),
    /// Error reading a compiled contract artifact
    ArtifactLoading(String),
    /// Error compiling the contracts
    ContractCompilation(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error verifying a contract on the block explorer
    ContractVerification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for client signing: {}", s)
            }
            ScriptError::ArtifactLoading(s) => write!(f, "error loading artifact: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contract: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractVerification(s) => {
                write!(f, "error verifying contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
