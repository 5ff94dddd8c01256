//! Submission of contract creation transactions

use std::{future::Future, str::FromStr};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{debug, info};

use crate::{constants::RECEIPT_POLL_INTERVAL, errors::ScriptError, types::DeployedContract};

/// The provider type used to deploy contracts
pub type Wallet = DynProvider<Ethereum>;

/// A chain on which contracts can be created
pub trait DeployBackend {
    /// Submit a contract creation transaction carrying `code` and wait for
    /// its receipt
    fn deploy(
        &self,
        code: Bytes,
    ) -> impl Future<Output = Result<DeployedContract, ScriptError>> + Send;
}

/// Deploys contracts through a JSON-RPC node, signing with a local key
#[derive(Clone)]
pub struct ChainDeployer {
    /// The signing provider
    client: Wallet,
    /// The address transactions are sent from
    deployer_address: Address,
}

impl ChainDeployer {
    /// Wrap an already configured provider
    pub fn new(client: Wallet, deployer_address: Address) -> Self {
        Self {
            client,
            deployer_address,
        }
    }

    /// The address transactions are sent from
    pub fn deployer_address(&self) -> Address {
        self.deployer_address
    }

    /// Wait until the receipt of `tx_hash` is available.
    ///
    /// There is no timeout, the node is polled until the transaction lands.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TransactionReceipt, ScriptError> {
        loop {
            let receipt = self
                .client
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

            match receipt {
                Some(receipt) => return Ok(receipt),
                None => {
                    debug!("No receipt yet for {tx_hash}");
                    tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
                }
            }
        }
    }
}

/// Sets up the client with which contracts are deployed from a private key
/// and an RPC url
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<ChainDeployer, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let deployer_address = signer.address();

    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    let deployer = ChainDeployer::new(DynProvider::new(provider), deployer_address);

    // Fail on an unreachable node before anything is submitted
    let chain_id = deployer
        .client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    info!(
        "Connected to chain {chain_id} as {}",
        deployer.deployer_address()
    );

    Ok(deployer)
}

impl DeployBackend for ChainDeployer {
    async fn deploy(&self, code: Bytes) -> Result<DeployedContract, ScriptError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer_address)
            .with_deploy_code(code);

        let pending_tx = self
            .client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let tx_hash = *pending_tx.tx_hash();
        info!("Submitted deployment transaction {tx_hash}");

        let receipt = self.wait_for_receipt(tx_hash).await?;
        deployed_from_receipt(tx_hash, &receipt)
    }
}

/// Check that a creation transaction succeeded and created a contract
fn deployed_from_receipt(
    tx_hash: TxHash,
    receipt: &TransactionReceipt,
) -> Result<DeployedContract, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::DeploymentReverted(format!(
            "transaction {tx_hash}"
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("receipt of {tx_hash} has no contract address"))
    })?;

    Ok(DeployedContract { address, tx_hash })
}
