//! Error types: collaborator failures, amount parsing, configuration, and the
//! transfer workflow taxonomy.

use thiserror::Error;

use crate::core::messages;

/// Failures talking to the node, the UTXO indexer, or a wallet bridge.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The remote call executed but the contract reverted.
    #[error("{0}")]
    Revert(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RpcError::Decode(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("config file: {0}")]
    File(String),
}

/// Read-only queries made outside a transfer (balance lookups).
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no address given")]
    MissingAddress,

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl QueryError {
    pub fn user_message(&self) -> String {
        match self {
            QueryError::MissingAddress => messages::INVALID_WALLET_ADDRESS.into(),
            QueryError::Rpc(_) => messages::BALANCE_FETCH_FAILED.into(),
        }
    }
}

/// Every way a transfer attempt can stop. Each variant maps to exactly one
/// user-facing message via [`TransferError::user_message`].
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("amount or destination missing")]
    MissingFields,

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("destination {0} is not valid for the active network")]
    InvalidAddress(String),

    #[error("no wallet signer available")]
    NoWallet,

    #[error("wallet account is not a taproot address on the active network")]
    WrongNetwork,

    #[error("balance query failed: {0}")]
    Query(String),

    #[error("insufficient balance: holds {held}, requested {requested}")]
    InsufficientBalance { held: String, requested: String },

    #[error("no UTXO set satisfies the funding constraints")]
    InsufficientUtxos,

    #[error("simulation failed: {0}")]
    Simulation(String),

    #[error("simulation returned no calldata")]
    MissingCalldata,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("broadcast of {stage} failed: {reason}")]
    Broadcast { stage: &'static str, reason: String },

    #[error("broadcast results incomplete")]
    IncompleteBroadcast,

    #[error("a transfer is already in flight")]
    Busy,

    #[error("unexpected failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl TransferError {
    /// Text shown to the person who pressed confirm.
    pub fn user_message(&self) -> String {
        match self {
            TransferError::MissingFields => messages::FILL_ALL_FIELDS.into(),
            TransferError::InvalidAmount(_) => messages::INVALID_AMOUNT.into(),
            TransferError::InvalidAddress(_) => messages::INVALID_TRANSFER_ADDRESS.into(),
            TransferError::NoWallet => messages::UNSUPPORTED_WALLET.into(),
            TransferError::WrongNetwork => messages::INVALID_NETWORK.into(),
            TransferError::InsufficientBalance { held, requested } => format!(
                "Oops! Insufficient funds! You only have {} wBTC. You need {} wBTC to proceed.",
                held, requested
            ),
            TransferError::InsufficientUtxos => messages::INSUFFICIENT_FUNDS.into(),
            TransferError::Simulation(reason) => {
                format!("Could not create transaction. Simulation failed. {}", reason)
            }
            TransferError::Signing(_) | TransferError::Broadcast { .. } => {
                messages::TRANSACTION_FAILED.into()
            }
            TransferError::Busy => messages::TRANSFER_IN_PROGRESS.into(),
            TransferError::Query(_)
            | TransferError::MissingCalldata
            | TransferError::IncompleteBroadcast
            | TransferError::Unexpected(_) => messages::GENERIC_FAILURE.into(),
        }
    }
}
