//! Node transport: JSON-RPC 2.0 client, OP_NET provider methods, UTXO indexer.
//!
//! ```text
//! JsonRpcClient (reqwest, JSON-RPC 2.0 envelope)
//!     │
//!     ├── JsonRpcProvider ── btc_call, btc_sendRawTransaction
//!     │        └── TransactionBroadcaster (trait)
//!     │
//!     └── WalletBridge (crate::wallet)
//!
//! OpnetUtxoProvider ── GET /api/v1/address/utxos
//!     └── UtxoProvider (trait)
//! ```

mod jsonrpc;
mod provider;
mod utxo;

pub use jsonrpc::{JsonRpcClient, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use provider::{BroadcastResult, CallOutput, JsonRpcProvider, TransactionBroadcaster};
pub use utxo::{select_utxos, FetchUtxoParams, OpnetUtxoProvider, ScriptPubKey, Utxo, UtxoProvider};
