//! Type definitions used throughout the deploy script

use std::fmt::{self, Display};

use alloy::primitives::{Address, TxHash};
use clap::ValueEnum;

use crate::{
    constants::{INITIAL_MINT_ENV_VAR, MAX_SUPPLY_ENV_VAR, OWNER_ADDRESS_ENV_VAR},
    errors::ScriptError,
};

/// The constructor signatures the token contract is deployed with
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstructorVariant {
    /// `constructor(address owner)`
    OwnerOnly,
    /// `constructor(address owner, uint256 initialMint, uint256 maxSupply)`
    OwnerMintSupply,
}

impl ConstructorVariant {
    /// The environment variables holding the constructor arguments,
    /// in the order the constructor takes them
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            ConstructorVariant::OwnerOnly => &[OWNER_ADDRESS_ENV_VAR],
            ConstructorVariant::OwnerMintSupply => {
                &[OWNER_ADDRESS_ENV_VAR, INITIAL_MINT_ENV_VAR, MAX_SUPPLY_ENV_VAR]
            }
        }
    }

    /// The number of constructor arguments
    pub fn arity(&self) -> usize {
        self.env_vars().len()
    }

    /// Select the variant whose arity matches a contract constructor
    pub fn for_arity(arity: usize) -> Option<Self> {
        [ConstructorVariant::OwnerOnly, ConstructorVariant::OwnerMintSupply]
            .into_iter()
            .find(|variant| variant.arity() == arity)
    }
}

impl Display for ConstructorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorVariant::OwnerOnly => write!(f, "owner-only"),
            ConstructorVariant::OwnerMintSupply => write!(f, "owner-mint-supply"),
        }
    }
}

/// The constructor arguments of a deployment, as read from the environment.
///
/// Values are kept as raw strings; they are coerced to the types declared
/// by the contract's constructor when the deployment calldata is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentParams {
    /// The constructor arguments, in constructor order
    pub args: Vec<String>,
}

impl DeploymentParams {
    /// Read the constructor arguments for `variant` using `lookup`.
    ///
    /// An unset or empty variable is an error; nothing is deployed with a
    /// blank argument.
    pub fn from_env<F>(variant: ConstructorVariant, lookup: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let args = variant
            .env_vars()
            .iter()
            .map(|&var| {
                lookup(var)
                    .map(|val| val.trim().to_string())
                    .filter(|val| !val.is_empty())
                    .ok_or(ScriptError::MissingEnvVar(var))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { args })
    }
}

/// A contract confirmed on-chain
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the contract creation transaction
    pub tx_hash: TxHash,
}

/// The lifecycle of a single deployment, as reported in the logs.
///
/// The state only labels log lines. Control flow follows the `Result`s
/// of the deployment steps, not this value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeploymentState {
    /// The creation transaction has not settled yet
    Pending,
    /// The creation transaction settled and the address is known
    Confirmed(Address),
    /// The deployment was reported
    Done(Address),
    /// The deployment failed
    Failed,
}

impl DeploymentState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentState::Done(_) | DeploymentState::Failed)
    }

    /// Record the confirmed address of a pending deployment
    pub fn confirm(self, address: Address) -> Self {
        match self {
            DeploymentState::Pending => DeploymentState::Confirmed(address),
            other => other,
        }
    }

    /// Mark a confirmed deployment as reported
    pub fn finish(self) -> Self {
        match self {
            DeploymentState::Confirmed(address) => DeploymentState::Done(address),
            other => other,
        }
    }

    /// Mark a non-terminal deployment as failed
    pub fn fail(self) -> Self {
        if self.is_terminal() {
            self
        } else {
            DeploymentState::Failed
        }
    }
}

impl Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentState::Pending => write!(f, "PENDING"),
            DeploymentState::Confirmed(_) => write!(f, "CONFIRMED"),
            DeploymentState::Done(_) => write!(f, "DONE"),
            DeploymentState::Failed => write!(f, "FAILED"),
        }
    }
}
