//! In-memory collaborators that record every call in order.

#![allow(dead_code)]

use async_trait::async_trait;
use bitcoin::key::CompressedPublicKey;
use bitcoin::secp256k1::{Keypair, Secp256k1, SecretKey};
use bitcoin::Address;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use wbtc_node::contract::{ContractProxy, TransferCall};
use wbtc_node::node::NodeParts;
use wbtc_node::rpc::{FetchUtxoParams, ScriptPubKey};
use wbtc_node::{
    Amount, BroadcastResult, InteractionParameters, LocalSigner, Network, NetworkAddressValidator, Node, NodeConfig,
    RpcError, SignedInteraction, Signer, TransactionBroadcaster, Utxo, UtxoProvider, WalletExtension,
};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn record(log: &CallLog, entry: impl Into<String>) {
    log.lock().unwrap_or_else(|p| p.into_inner()).push(entry.into());
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap_or_else(|p| p.into_inner()).clone()
}

fn keypair(seed: u8) -> Keypair {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[seed.max(1); 32]).expect("valid key");
    Keypair::from_secret_key(&secp, &sk)
}

pub fn p2tr(seed: u8, network: Network) -> String {
    let secp = Secp256k1::new();
    let (xonly, _) = keypair(seed).x_only_public_key();
    Address::p2tr(&secp, xonly, None, network.to_bitcoin()).to_string()
}

pub fn p2wpkh(seed: u8, network: Network) -> String {
    let pk = CompressedPublicKey(keypair(seed).public_key());
    Address::p2wpkh(&pk, network.to_bitcoin()).to_string()
}

pub fn accepted(txid: &str, peers: Option<u32>) -> BroadcastResult {
    BroadcastResult { success: true, result: Some(txid.into()), error: None, peers }
}

pub fn rejected(reason: &str) -> BroadcastResult {
    BroadcastResult { success: false, result: None, error: Some(reason.into()), peers: None }
}

pub fn utxo(txid: &str, value: u64) -> Utxo {
    Utxo { txid: txid.into(), vout: 0, value, script_pubkey: ScriptPubKey { hex: "5120".into(), address: None } }
}

pub enum Simulation {
    Calldata(Vec<u8>),
    Revert(String),
}

pub struct MockContract {
    pub log: CallLog,
    pub balance: Mutex<Result<Amount, String>>,
    pub simulation: Simulation,
    pub transferred: Mutex<Option<Amount>>,
}

#[async_trait]
impl ContractProxy for MockContract {
    fn address(&self) -> &str { "bcrt1pwbtccontract" }

    async fn balance_of(&self, owner: &str, _sender: Option<&str>) -> Result<Amount, RpcError> {
        record(&self.log, format!("balance_of:{owner}"));
        self.balance.lock().unwrap().clone().map_err(RpcError::Transport)
    }

    async fn total_supply(&self, _sender: Option<&str>) -> Result<Amount, RpcError> {
        record(&self.log, "total_supply");
        Ok(Amount::from_sats(2_100_000_000_000_000))
    }

    async fn owner(&self, _sender: Option<&str>) -> Result<String, RpcError> {
        record(&self.log, "owner");
        Ok("bcrt1powner".into())
    }

    async fn transfer(&self, to: &str, amount: &Amount, _sender: Option<&str>) -> Result<TransferCall, RpcError> {
        record(&self.log, format!("simulate:{to}"));
        *self.transferred.lock().unwrap() = Some(amount.clone());
        match &self.simulation {
            Simulation::Calldata(data) => Ok(TransferCall { calldata: data.clone(), estimated_gas: Some(21_000) }),
            Simulation::Revert(text) => Err(RpcError::Revert(text.clone())),
        }
    }
}

pub struct MockUtxos {
    pub log: CallLog,
    pub utxos: Vec<Utxo>,
    /// When set, every fetch fails with this body.
    pub error: Option<String>,
    pub last_params: Mutex<Option<FetchUtxoParams>>,
}

#[async_trait]
impl UtxoProvider for MockUtxos {
    async fn fetch_utxo_multi_addr(&self, params: &FetchUtxoParams) -> Result<Vec<Utxo>, RpcError> {
        record(&self.log, "fetch_utxos");
        *self.last_params.lock().unwrap() = Some(params.clone());
        match &self.error {
            Some(body) => Err(RpcError::Http { status: 503, body: body.clone() }),
            None => Ok(self.utxos.clone()),
        }
    }
}

pub struct MockBroadcaster {
    pub log: CallLog,
    pub responses: Mutex<VecDeque<Result<BroadcastResult, RpcError>>>,
    /// When set, each broadcast waits here until notified.
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl TransactionBroadcaster for MockBroadcaster {
    async fn send_raw_transaction(&self, raw_tx: &str, _psbt: bool) -> Result<BroadcastResult, RpcError> {
        record(&self.log, format!("broadcast:{raw_tx}"));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::Transport("no scripted response".into())))
    }
}

pub struct MockLocalSigner {
    pub log: CallLog,
    pub accounts: Vec<String>,
    pub signed: Option<SignedInteraction>,
    pub last_params: Mutex<Option<InteractionParameters>>,
}

#[async_trait]
impl LocalSigner for MockLocalSigner {
    async fn request_accounts(&self) -> anyhow::Result<Vec<String>> {
        record(&self.log, "request_accounts");
        Ok(self.accounts.clone())
    }

    async fn sign_interaction(&self, params: &InteractionParameters) -> anyhow::Result<Option<SignedInteraction>> {
        record(&self.log, "sign");
        *self.last_params.lock().unwrap() = Some(params.clone());
        Ok(self.signed.clone())
    }
}

pub struct MockExtension {
    pub log: CallLog,
    pub accounts: Vec<String>,
    pub pair: (Option<BroadcastResult>, Option<BroadcastResult>),
}

#[async_trait]
impl WalletExtension for MockExtension {
    async fn request_accounts(&self) -> anyhow::Result<Vec<String>> {
        record(&self.log, "request_accounts");
        Ok(self.accounts.clone())
    }

    async fn sign_interaction(
        &self,
        _params: &InteractionParameters,
    ) -> anyhow::Result<(Option<BroadcastResult>, Option<BroadcastResult>)> {
        record(&self.log, "web3_sign");
        Ok(self.pair.clone())
    }
}

pub enum SignerKind {
    None,
    Local { signed: Option<SignedInteraction> },
    Extension { pair: (Option<BroadcastResult>, Option<BroadcastResult>) },
}

/// A node wired to mocks. Defaults describe a funded regtest wallet whose
/// transfer goes through end to end.
pub struct Harness {
    pub log: CallLog,
    pub balance: Result<Amount, String>,
    pub utxos: Vec<Utxo>,
    pub utxo_error: Option<String>,
    pub simulation: Simulation,
    pub responses: Vec<Result<BroadcastResult, RpcError>>,
    pub accounts: Vec<String>,
    pub signer: SignerKind,
    pub gate: Option<Arc<Notify>>,
}

pub struct Built {
    pub node: Node,
    pub log: CallLog,
    pub contract: Arc<MockContract>,
    pub utxos: Arc<MockUtxos>,
    pub local: Option<Arc<MockLocalSigner>>,
}

pub fn sender() -> String { p2tr(1, Network::Regtest) }
pub fn destination() -> String { p2tr(2, Network::Regtest) }

impl Default for Harness {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            balance: Ok(Amount::from_sats(100_000_000)),
            utxos: vec![utxo("aa", 60_000), utxo("bb", 60_000)],
            utxo_error: None,
            simulation: Simulation::Calldata(vec![0xca, 0x11]),
            responses: vec![Ok(accepted("funding-txid", Some(3))), Ok(accepted("interaction-txid", Some(4)))],
            accounts: vec![p2wpkh(1, Network::Regtest), sender()],
            signer: SignerKind::Local {
                signed: Some(SignedInteraction { funding_tx: "raw-a".into(), interaction_tx: "raw-b".into() }),
            },
            gate: None,
        }
    }
}

impl Harness {
    pub fn build(self) -> Built {
        let log = self.log.clone();
        let contract = Arc::new(MockContract {
            log: log.clone(),
            balance: Mutex::new(self.balance),
            simulation: self.simulation,
            transferred: Mutex::new(None),
        });
        let utxos = Arc::new(MockUtxos {
            log: log.clone(),
            utxos: self.utxos,
            error: self.utxo_error,
            last_params: Mutex::new(None),
        });
        let broadcaster = Arc::new(MockBroadcaster {
            log: log.clone(),
            responses: Mutex::new(self.responses.into_iter().collect()),
            gate: self.gate,
        });

        let mut local = None;
        let signer = match self.signer {
            SignerKind::None => None,
            SignerKind::Local { signed } => {
                let s = Arc::new(MockLocalSigner {
                    log: log.clone(),
                    accounts: self.accounts,
                    signed,
                    last_params: Mutex::new(None),
                });
                local = Some(s.clone());
                Some(Signer::Local(s))
            }
            SignerKind::Extension { pair } => {
                Some(Signer::Extension(Arc::new(MockExtension { log: log.clone(), accounts: self.accounts, pair })))
            }
        };

        let node = Node::from_parts(
            NodeConfig::new("test").with_contract("bcrt1pwbtccontract"),
            NodeParts {
                contract: contract.clone(),
                utxos: utxos.clone(),
                broadcaster,
                validator: Arc::new(NetworkAddressValidator),
                signer,
            },
        );
        Built { node, log, contract, utxos, local }
    }
}
