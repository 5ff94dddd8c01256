//! End-to-end tests of the token deployment against a recording backend

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use airdrop_token_scripts::{
    cli::DeployArgs,
    commands::deploy_token,
    constants::{DEFAULT_CONTRACT_NAME, DEFAULT_EXPLORER_URL},
    deployer::DeployBackend,
    errors::ScriptError,
    types::{ConstructorVariant, DeployedContract},
    utils::parse_addr_from_deployments_file,
};
use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use alloy_sol_types::SolValue;
use eyre::Result;

/// The creation bytecode in the test artifacts
const BYTECODE: [u8; 5] = [0x60, 0x80, 0x60, 0x40, 0x52];

/// The token owner used in the tests
const OWNER: Address = address!("00000000000000000000000000000000000000aa");

/// The address the backend reports the token at
const DEPLOYED: Address = address!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");

/// A backend recording the creation code of every deployment
struct RecordingBackend {
    /// The creation code of each deploy call, in order
    calls: Mutex<Vec<Bytes>>,
    /// What every deploy call returns
    outcome: Result<DeployedContract, ScriptError>,
}

impl RecordingBackend {
    fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(DeployedContract {
                address: DEPLOYED,
                tx_hash: TxHash::repeat_byte(0x01),
            }),
        }
    }

    fn failing(err: ScriptError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Err(err),
        }
    }

    fn calls(&self) -> Vec<Bytes> {
        self.calls.lock().unwrap().clone()
    }
}

impl DeployBackend for RecordingBackend {
    async fn deploy(&self, code: Bytes) -> Result<DeployedContract, ScriptError> {
        self.calls.lock().unwrap().push(code);
        self.outcome.clone()
    }
}

/// Write a Hardhat artifact for a constructor with the given inputs into a
/// fresh artifacts directory
fn artifacts_dir(test_name: &str, constructor_inputs: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "airdrop-token-scripts-it-{}-{}",
        std::process::id(),
        test_name
    ));
    let _ = fs::remove_dir_all(&dir);

    let contract_dir = dir
        .join("contracts")
        .join(format!("{DEFAULT_CONTRACT_NAME}.sol"));
    fs::create_dir_all(&contract_dir).unwrap();

    let inputs = constructor_inputs
        .iter()
        .map(|(name, ty)| serde_json::json!({ "name": name, "type": ty, "internalType": ty }))
        .collect::<Vec<_>>();
    let artifact = serde_json::json!({
        "_format": "hh-sol-artifact-1",
        "contractName": DEFAULT_CONTRACT_NAME,
        "abi": [{ "type": "constructor", "stateMutability": "nonpayable", "inputs": inputs }],
        "bytecode": format!("0x{}", hex::encode(BYTECODE)),
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(
        contract_dir.join(format!("{DEFAULT_CONTRACT_NAME}.json")),
        artifact.to_string(),
    )
    .unwrap();

    dir
}

fn three_arg_dir(test_name: &str) -> PathBuf {
    artifacts_dir(
        test_name,
        &[
            ("owner", "address"),
            ("initialMint", "uint256"),
            ("maxSupply", "uint256"),
        ],
    )
}

fn deploy_args(artifacts_dir: &Path) -> DeployArgs {
    DeployArgs {
        artifacts_dir: artifacts_dir.to_path_buf(),
        contract: DEFAULT_CONTRACT_NAME.to_string(),
        variant: None,
        explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        deployments_path: None,
    }
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_three_arg_deploy() -> Result<()> {
    let dir = three_arg_dir("three-arg");
    let mut args = deploy_args(&dir);
    let deployments_path = dir.join("deployments.json");
    args.deployments_path = Some(deployments_path.clone());

    let vars = env(&[
        ("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
        ("INITIAL_MINT", "1000"),
        ("MAX_SUPPLY", "5000"),
    ]);
    let backend = RecordingBackend::succeeding();
    let mut out = Vec::new();

    let deployed = deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut out).await?;
    assert_eq!(deployed.address, DEPLOYED);

    // Exactly one deployment, with the arguments in constructor order
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    let expected_args = (OWNER, U256::from(1000), U256::from(5000)).abi_encode_params();
    assert_eq!(&calls[0][..BYTECODE.len()], BYTECODE.as_slice());
    assert_eq!(&calls[0][BYTECODE.len()..], expected_args.as_slice());

    let stdout = String::from_utf8(out)?;
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(
        "https://bscscan.com/address/0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
    ));

    assert_eq!(
        parse_addr_from_deployments_file(&deployments_path, DEFAULT_CONTRACT_NAME)?,
        DEPLOYED
    );

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_owner_only_deploy() -> Result<()> {
    let dir = artifacts_dir("owner-only", &[("owner", "address")]);
    let mut args = deploy_args(&dir);
    args.variant = Some(ConstructorVariant::OwnerOnly);

    // Supply variables are ignored by the single-argument constructor
    let vars = env(&[
        ("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
        ("MAX_SUPPLY", "5000"),
    ]);
    let backend = RecordingBackend::succeeding();

    deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut Vec::<u8>::new()).await?;

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        &calls[0][BYTECODE.len()..],
        (OWNER,).abi_encode_params().as_slice()
    );

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_missing_env_var_deploys_nothing() -> Result<()> {
    let dir = three_arg_dir("missing-var");
    let args = deploy_args(&dir);

    let vars = env(&[
        ("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
        ("INITIAL_MINT", "1000"),
    ]);
    let backend = RecordingBackend::succeeding();
    let mut out = Vec::new();

    let err = deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err, ScriptError::MissingEnvVar("MAX_SUPPLY"));
    assert!(backend.calls().is_empty());

    // Only the start notice was written
    let stdout = String::from_utf8(out)?;
    assert_eq!(stdout.lines().count(), 1);
    assert!(!stdout.contains("bscscan.com"));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_variant_mismatch_deploys_nothing() -> Result<()> {
    let dir = three_arg_dir("variant-mismatch");
    let mut args = deploy_args(&dir);
    args.variant = Some(ConstructorVariant::OwnerOnly);

    let vars = env(&[("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa")]);
    let backend = RecordingBackend::succeeding();

    let err = deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut Vec::<u8>::new())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ScriptError::ConstructorMismatch {
            expected: 3,
            found: 1
        }
    );
    assert!(backend.calls().is_empty());

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_backend_failure_propagates() -> Result<()> {
    let dir = three_arg_dir("backend-failure");
    let mut args = deploy_args(&dir);
    let deployments_path = dir.join("deployments.json");
    args.deployments_path = Some(deployments_path.clone());

    let vars = env(&[
        ("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
        ("INITIAL_MINT", "1000"),
        ("MAX_SUPPLY", "5000"),
    ]);
    let backend =
        RecordingBackend::failing(ScriptError::ContractDeployment("insufficient funds".into()));
    let mut out = Vec::new();

    let err = deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "error deploying contract: insufficient funds"
    );
    assert_eq!(backend.calls().len(), 1);
    assert!(!String::from_utf8(out)?.contains("bscscan.com"));
    assert!(!deployments_path.exists());

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_missing_artifact() -> Result<()> {
    let dir = three_arg_dir("missing-artifact");
    let mut args = deploy_args(&dir);
    args.contract = "SomethingElse".to_string();

    let backend = RecordingBackend::succeeding();
    let err = deploy_token(&args, &backend, |_| None, &mut Vec::<u8>::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ScriptError::ReadArtifact(_)));
    assert!(backend.calls().is_empty());

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[tokio::test]
async fn test_failed_record_keeps_deployment_successful() -> Result<()> {
    let dir = three_arg_dir("failed-record");
    let mut args = deploy_args(&dir);
    // The parent directory does not exist, so the record cannot be written
    let deployments_path = dir.join("missing").join("deployments.json");
    args.deployments_path = Some(deployments_path.clone());

    let vars = env(&[
        ("OWNER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
        ("INITIAL_MINT", "1000"),
        ("MAX_SUPPLY", "5000"),
    ]);
    let backend = RecordingBackend::succeeding();
    let mut out = Vec::new();

    let deployed = deploy_token(&args, &backend, |var| vars.get(var).cloned(), &mut out).await?;
    assert_eq!(deployed.address, DEPLOYED);
    assert_eq!(backend.calls().len(), 1);

    let stdout = String::from_utf8(out)?;
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.contains("bscscan.com/address/"));
    assert!(!deployments_path.exists());

    fs::remove_dir_all(dir)?;
    Ok(())
}
