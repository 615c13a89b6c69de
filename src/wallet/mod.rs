//! Wallet module - signing capability and the connected-account session
//!
//! # Architecture
//!
//! ```text
//! Signer (selected once per session)
//!     │
//!     ├── Local(LocalSigner)         sign → [funding_tx, interaction_tx]
//!     │                                  → caller broadcasts A then B
//!     │
//!     └── Extension(WalletExtension) web3 sign → [BroadcastResult; 2]
//!                                        (wallet broadcasts both)
//!
//! WalletBridge (JSON-RPC) implements both; Signer::detect picks one.
//!
//! WalletSession
//!     └── binding: RwLock<Option<SessionBinding>>  (written only by connect)
//! ```

mod bridge;
mod session;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

use crate::network::Network;
use crate::rpc::{BroadcastResult, Utxo};

pub use bridge::WalletBridge;
pub use session::{SessionBinding, WalletSession};

/// Everything a signer needs to build the funding and interaction
/// transactions for one contract call. Built once per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionParameters {
    pub from: String,
    pub to: String,
    pub utxos: Vec<Utxo>,
    pub network: Network,
    pub fee_rate: u64,
    pub priority_fee: u64,
    #[serde(serialize_with = "as_hex")]
    pub calldata: Vec<u8>,
}

fn as_hex<S: Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Raw transactions in broadcast order: funding first, interaction second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInteraction {
    pub funding_tx: String,
    pub interaction_tx: String,
}

/// Signs in-process and hands back both raw transactions.
#[async_trait]
pub trait LocalSigner: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<String>>;
    /// `None` when the signer produced nothing to broadcast.
    async fn sign_interaction(&self, params: &InteractionParameters) -> Result<Option<SignedInteraction>>;
}

/// Wallet that signs and broadcasts the pair itself.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<String>>;
    async fn sign_interaction(
        &self,
        params: &InteractionParameters,
    ) -> Result<(Option<BroadcastResult>, Option<BroadcastResult>)>;
}

#[derive(Clone)]
pub enum Signer {
    Local(Arc<dyn LocalSigner>),
    Extension(Arc<dyn WalletExtension>),
}

impl Signer {
    pub fn kind(&self) -> &'static str {
        match self { Signer::Local(_) => "local", Signer::Extension(_) => "extension" }
    }

    pub async fn request_accounts(&self) -> Result<Vec<String>> {
        match self {
            Signer::Local(s) => s.request_accounts().await,
            Signer::Extension(s) => s.request_accounts().await,
        }
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signer::{}", self.kind())
    }
}
