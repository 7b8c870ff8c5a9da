//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The signing key is missing or malformed
    Credential(String),
    /// The requested network has no configured profile
    UnknownNetwork(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a compiled contract artifact
    ArtifactParsing(String),
    /// Error constructing constructor calldata
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// A plan step referenced a contract that had not been deployed yet
    PlanOrdering(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error writing progress output
    Reporting(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Credential(s) => write!(f, "invalid signing credential: {}", s),
            ScriptError::UnknownNetwork(s) => write!(f, "unknown network: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::PlanOrdering(s) => write!(f, "invalid deployment order: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::Reporting(s) => write!(f, "error reporting progress: {}", s),
        }
    }
}

impl Error for ScriptError {}
