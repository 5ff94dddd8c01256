//! Definitions of errors that can occur during the execution of the deploy script

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error parsing the command-line / environment configuration
    Configuration(String),
    /// A required constructor argument was not set in the environment
    MissingEnvVar(&'static str),
    /// Error locating or reading a contract compilation artifact
    ReadArtifact(String),
    /// Error parsing a contract compilation artifact
    ArtifactParsing(String),
    /// The constructor arguments do not match the contract's constructor
    ConstructorMismatch {
        /// The number of inputs the contract's constructor declares
        expected: usize,
        /// The number of arguments supplied
        found: usize,
    },
    /// Error constructing the deployment calldata
    CalldataConstruction(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error submitting or confirming the deployment transaction
    ContractDeployment(String),
    /// The deployment transaction was mined but reverted
    DeploymentReverted(String),
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
    /// Error writing the deployment notices
    Output(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "invalid configuration: {}", s),
            ScriptError::MissingEnvVar(var) => {
                write!(f, "missing required environment variable `{}`", var)
            }
            ScriptError::ReadArtifact(s) => write!(f, "error reading artifact: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ConstructorMismatch { expected, found } => write!(
                f,
                "constructor expects {} argument(s), but {} were supplied",
                expected, found
            ),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::DeploymentReverted(s) => write!(f, "deployment reverted: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::Output(s) => write!(f, "error writing output: {}", s),
        }
    }
}

impl Error for ScriptError {}
