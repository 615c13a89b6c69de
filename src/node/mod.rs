//! Node - wires the node provider, token contract, wallet session, transfer
//! orchestrator and supply watcher from one `NodeConfig`.

pub mod config;

pub use config::NodeConfig;

use serde::Serialize;
use std::sync::Arc;

use crate::contract::{ContractProxy, WbtcContract};
use crate::core::{messages, Amount};
use crate::error::{ConfigError, QueryError, RpcError, TransferError};
use crate::network::{AddressValidator, Network, NetworkAddressValidator};
use crate::rpc::{JsonRpcProvider, OpnetUtxoProvider, TransactionBroadcaster, UtxoProvider};
use crate::supply::{SupplySnapshot, SupplyWatcher};
use crate::transfer::{Feedback, TransferOrchestrator, TransferReceipt, TransferRequest};
use crate::wallet::{Signer, WalletBridge, WalletSession};

/// Collaborators a `Node` is built from. `from_config` makes the network-backed
/// ones; tests pass their own.
pub struct NodeParts {
    pub contract: Arc<dyn ContractProxy>,
    pub utxos: Arc<dyn UtxoProvider>,
    pub broadcaster: Arc<dyn TransactionBroadcaster>,
    pub validator: Arc<dyn AddressValidator>,
    pub signer: Option<Signer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletStatus {
    pub connected: bool,
    pub signer: Option<&'static str>,
    pub account: Option<String>,
    pub sender: Option<String>,
    pub addresses: Vec<String>,
    /// Connected account's wBTC balance, formatted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
}

pub struct Node {
    config: NodeConfig,
    contract: Arc<dyn ContractProxy>,
    validator: Arc<dyn AddressValidator>,
    session: Arc<WalletSession>,
    orchestrator: TransferOrchestrator,
    supply: Arc<SupplyWatcher>,
}

impl Node {
    /// Build against the configured node. An unreachable wallet bridge leaves
    /// the node without a signer rather than failing.
    pub async fn from_config(config: NodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rpc_url = config.effective_rpc_url()?;
        let contract_address = config.effective_contract()?;

        let provider = Arc::new(JsonRpcProvider::new(&rpc_url));
        let contract = Arc::new(WbtcContract::new(contract_address, provider.clone()));
        let utxos = Arc::new(OpnetUtxoProvider::new(&rpc_url));

        let signer = match config.wallet_bridge_url.as_deref() {
            Some(url) => match Signer::detect(Arc::new(WalletBridge::new(url))).await {
                Ok(signer) => Some(signer),
                Err(e) => {
                    tracing::warn!(%url, error = %format!("{e:#}"), "wallet bridge unavailable");
                    None
                }
            },
            None => None,
        };

        tracing::info!(network = config.network.as_str(), %rpc_url, contract = contract.address(), "node configured");
        Ok(Self::from_parts(
            config,
            NodeParts { contract, utxos, broadcaster: provider, validator: Arc::new(NetworkAddressValidator), signer },
        ))
    }

    pub fn from_parts(config: NodeConfig, parts: NodeParts) -> Self {
        let session = Arc::new(WalletSession::new(config.network, parts.signer));
        let orchestrator = TransferOrchestrator::new(
            session.clone(),
            parts.contract.clone(),
            parts.utxos,
            parts.broadcaster,
            parts.validator.clone(),
            config.transfer_settings(),
        );
        let supply = Arc::new(SupplyWatcher::new(parts.contract.clone(), config.supply_refresh()));
        Self { config, contract: parts.contract, validator: parts.validator, session, orchestrator, supply }
    }

    pub fn config(&self) -> &NodeConfig { &self.config }
    pub fn network(&self) -> Network { self.config.network }
    pub fn contract_address(&self) -> &str { self.contract.address() }
    pub fn supply_watcher(&self) -> Arc<SupplyWatcher> { self.supply.clone() }

    /// Live query; also refreshes the watcher's snapshot.
    pub async fn total_supply(&self) -> Result<SupplySnapshot, RpcError> {
        self.supply.refresh().await
    }

    pub async fn balance_of(&self, address: &str) -> Result<Amount, QueryError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(QueryError::MissingAddress);
        }
        let sender = self.session.binding().await.and_then(|b| b.sender);
        Ok(self.contract.balance_of(address, sender.as_deref()).await?)
    }

    pub async fn owner(&self) -> Result<String, RpcError> {
        self.contract.owner(None).await
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        self.validator.is_valid_destination(address, self.config.network)
    }

    /// Connect the wallet and look up the connected account's balance. A
    /// failed balance lookup is logged and leaves `balance` empty.
    pub async fn connect_wallet(&self) -> Result<WalletStatus, TransferError> {
        let binding = self.session.connect(self.validator.as_ref()).await?;
        let balance = match self.balance_of(&binding.account).await {
            Ok(amount) => Some(amount.to_btc_string()),
            Err(e) => {
                tracing::warn!(account = %binding.account, error = %e, "balance lookup after connect failed");
                None
            }
        };
        let mut status = self.wallet_status().await;
        status.balance = balance;
        Ok(status)
    }

    pub async fn wallet_status(&self) -> WalletStatus {
        let signer = self.session.signer().map(Signer::kind);
        match self.session.binding().await {
            Some(b) => WalletStatus {
                connected: true,
                signer,
                account: Some(b.account),
                sender: b.sender,
                addresses: b.addresses,
                balance: None,
            },
            None => WalletStatus {
                connected: false,
                signer,
                account: None,
                sender: None,
                addresses: Vec::new(),
                balance: None,
            },
        }
    }

    pub async fn execute_transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        self.orchestrator.execute(request).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> Feedback {
        self.orchestrator.confirm(request).await
    }
}

/// Feedback text for a failed wallet connect.
pub fn connect_failure_message(err: &TransferError) -> String {
    match err {
        TransferError::NoWallet => messages::WALLET_NOT_DETECTED.into(),
        other => other.user_message(),
    }
}
