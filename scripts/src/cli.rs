//! Definitions of CLI arguments for the deploy script
//!
//! Every argument can be supplied through the environment, so the script
//! runs with no flags at all.

use std::{ffi::OsString, path::PathBuf};

use clap::{Args, Parser};

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACT_NAME, DEFAULT_EXPLORER_URL, DEFAULT_RPC_URL,
    },
    errors::ScriptError,
    types::ConstructorVariant,
};

/// Deploy the CNDY airdrop token and print its block explorer page
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// What to deploy, and where to report it
    #[command(flatten)]
    pub deploy: DeployArgs,
}

impl Cli {
    /// Parse the CLI from `args`, falling back to the environment.
    ///
    /// Usage errors are returned as [`ScriptError::Configuration`] so they
    /// exit like any other failure. `--help` and `--version` print and exit.
    pub fn parse_args<I, T>(args: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if !e.use_stderr() => e.exit(),
            Err(e) => Err(ScriptError::Configuration(e.to_string())),
        }
    }
}

/// What to deploy, and where to report it
#[derive(Args, Clone, Debug)]
pub struct DeployArgs {
    /// Directory searched for the contract's compilation artifact
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Name of the contract to deploy
    #[arg(short, long, env = "CONTRACT_NAME", default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// Constructor signature to deploy with, inferred from the artifact when unset
    #[arg(long, env = "CONSTRUCTOR_VARIANT")]
    pub variant: Option<ConstructorVariant>,

    /// Block explorer under which the deployed address is linked
    #[arg(long, env = "EXPLORER_URL", default_value = DEFAULT_EXPLORER_URL)]
    pub explorer_url: String,

    /// Optional `deployments.json` file in which to record the deployed address
    #[arg(short, long, env = "DEPLOYMENTS_PATH")]
    pub deployments_path: Option<PathBuf>,
}
