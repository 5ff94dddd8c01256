//! Constants used in the deploy script

use std::time::Duration;

/// The name of the contract artifact deployed by default
pub const DEFAULT_CONTRACT_NAME: &str = "AirdropCandyToken";

/// The default directory searched for contract compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default RPC URL, a local devnet node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default block explorer under which deployed addresses are linked
pub const DEFAULT_EXPLORER_URL: &str = "https://bscscan.com";

/// The path segment preceding an address in a block explorer URL
pub const EXPLORER_ADDRESS_PATH_SEGMENT: &str = "address";

/// The human-readable name of the token, used in the deployment notices
pub const TOKEN_DISPLAY_NAME: &str = "CNDY Airdrop Token";

/// The environment variable holding the token owner's address
pub const OWNER_ADDRESS_ENV_VAR: &str = "OWNER_ADDRESS";

/// The environment variable holding the amount minted at construction
pub const INITIAL_MINT_ENV_VAR: &str = "INITIAL_MINT";

/// The environment variable holding the token's maximum supply
pub const MAX_SUPPLY_ENV_VAR: &str = "MAX_SUPPLY";

/// The extension of a contract compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The ABI key in a compilation artifact
pub const ABI_KEY: &str = "abi";

/// The creation bytecode key in a compilation artifact
pub const BYTECODE_KEY: &str = "bytecode";

/// The key of the bytecode hex string when the bytecode is an object
/// (Foundry artifacts)
pub const BYTECODE_OBJECT_KEY: &str = "object";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The number of spaces used to indent the `deployments.json` file
pub const DEPLOYMENTS_INDENT: u16 = 4;

/// The exit code of a successful run
pub const SUCCESS_EXIT_CODE: u8 = 0;

/// The exit code of a failed run, whatever the failure
pub const FAILURE_EXIT_CODE: u8 = 1;

/// The log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// The interval at which the receipt of a submitted deployment is polled
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);
