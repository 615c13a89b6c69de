//! wbtc-node: headless client for a wrapped-Bitcoin token on an OP_NET node.
//!
//! # Architecture
//!
//! ```text
//! Node (entry point, built from NodeConfig)
//!   │
//!   ├── JsonRpcProvider ──── btc_call / btc_sendRawTransaction
//!   │     └── WbtcContract (ContractProxy: balanceOf, totalSupply, owner, transfer)
//!   │
//!   ├── OpnetUtxoProvider ── funding UTXOs
//!   │
//!   ├── WalletSession
//!   │     └── Signer: Local | Extension (WalletBridge)
//!   │
//!   ├── TransferOrchestrator
//!   │     validate → balance → UTXOs → simulate → build → broadcast A, B
//!   │
//!   └── SupplyWatcher (total supply every 30 s)
//! ```
//!
//! # Features
//!
//! - `server` (default) - HTTP API via axum
//!
//! # Usage
//!
//! ```ignore
//! use wbtc_node::{Network, Node, NodeConfig, TransferRequest};
//!
//! let node = Node::from_config(
//!     NodeConfig::new("myapp")
//!         .with_network(Network::Testnet)
//!         .with_wallet_bridge("http://127.0.0.1:7777")
//! ).await?;
//!
//! let supply = node.total_supply().await?;
//! let feedback = node.transfer(&TransferRequest::new("0.5", "tb1p...")).await;
//! println!("{}", feedback.message);
//! ```

pub mod contract;
pub mod core;
pub mod error;
pub mod logging;
pub mod network;
pub mod node;
pub mod rpc;
pub mod runtime;
#[cfg(feature = "server")]
pub mod server;
pub mod supply;
pub mod transfer;
pub mod wallet;

pub use contract::{ContractProxy, TransferCall, WbtcContract};
pub use crate::core::Amount;
pub use error::{AmountError, ConfigError, QueryError, RpcError, TransferError};
pub use network::{AddressValidator, Network, NetworkAddressValidator};
pub use node::{Node, NodeConfig, NodeParts, WalletStatus};
pub use rpc::{BroadcastResult, JsonRpcProvider, OpnetUtxoProvider, TransactionBroadcaster, Utxo, UtxoProvider};
pub use runtime::{install_signal_handlers, Shutdown};
pub use supply::{SupplySnapshot, SupplyWatcher};
pub use transfer::{Feedback, TransferOrchestrator, TransferReceipt, TransferRequest};
pub use wallet::{
    InteractionParameters, LocalSigner, SignedInteraction, Signer, WalletBridge, WalletExtension, WalletSession,
};

#[cfg(feature = "server")]
pub use server::create_router;
