//! Contract proxy for the wBTC token.
//!
//! ```text
//! ContractProxy (trait)
//!     │
//!     └── WbtcContract ──► JsonRpcProvider::call ("btc_call" simulation)
//!                               │
//!                               └── abi: selector + args in, base64 result out
//! ```

pub mod abi;
mod wbtc;

use async_trait::async_trait;

use crate::core::Amount;
use crate::error::RpcError;

pub use wbtc::WbtcContract;

/// Simulated `transfer` call: payload to embed in the interaction plus the
/// node's gas estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub calldata: Vec<u8>,
    pub estimated_gas: Option<u64>,
}

/// Read and simulate calls against the token contract. A revert is
/// [`RpcError::Revert`] carrying the contract's text.
#[async_trait]
pub trait ContractProxy: Send + Sync {
    fn address(&self) -> &str;
    async fn balance_of(&self, owner: &str, sender: Option<&str>) -> Result<Amount, RpcError>;
    async fn total_supply(&self, sender: Option<&str>) -> Result<Amount, RpcError>;
    async fn owner(&self, sender: Option<&str>) -> Result<String, RpcError>;
    async fn transfer(&self, to: &str, amount: &Amount, sender: Option<&str>) -> Result<TransferCall, RpcError>;
}
