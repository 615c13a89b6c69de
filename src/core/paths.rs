//! Path and method constants for the node, the UTXO indexer, the wallet
//! bridge, and the HTTP API.

/// OP_NET JSON-RPC endpoint and methods
pub mod rpc {
    pub const JSON_RPC_PATH: &str = "/api/v1/json-rpc";
    pub const UTXOS_PATH: &str = "/api/v1/address/utxos";

    pub const CALL: &str = "btc_call";
    pub const SEND_RAW_TRANSACTION: &str = "btc_sendRawTransaction";
}

/// Methods exposed by a wallet bridge (the headless stand-in for a browser
/// wallet extension)
pub mod bridge {
    pub const CAPABILITIES: &str = "wallet_getCapabilities";
    pub const REQUEST_ACCOUNTS: &str = "wallet_requestAccounts";
    pub const SIGN_INTERACTION: &str = "wallet_signInteraction";
    pub const WEB3_SIGN_INTERACTION: &str = "web3_signInteraction";

    pub const WEB3_CAPABILITY: &str = "web3";
}

/// Contract method names, hashed into selectors
pub mod contract {
    pub const BALANCE_OF: &str = "balanceOf";
    pub const TOTAL_SUPPLY: &str = "totalSupply";
    pub const OWNER: &str = "owner";
    pub const TRANSFER: &str = "transfer";
}

/// HTTP API routes
pub mod api {
    pub const HEALTH: &str = "/health";
    pub const SUPPLY: &str = "/supply";
    pub const BALANCE: &str = "/balance/:address";
    pub const OWNER: &str = "/owner";
    pub const WALLET_CONNECT: &str = "/wallet/connect";
    pub const WALLET_STATUS: &str = "/wallet/status";
    pub const TRANSFER: &str = "/transfer";
}
