//! WbtcContract - wBTC token calls through the node's call simulation

use async_trait::async_trait;
use std::sync::Arc;

use super::abi::{AbiReader, Calldata};
use super::{ContractProxy, TransferCall};
use crate::core::paths::contract as methods;
use crate::core::Amount;
use crate::error::RpcError;
use crate::rpc::JsonRpcProvider;

pub struct WbtcContract {
    address: String,
    provider: Arc<JsonRpcProvider>,
}

impl WbtcContract {
    pub fn new(address: impl Into<String>, provider: Arc<JsonRpcProvider>) -> Self {
        Self { address: address.into(), provider }
    }
}

#[async_trait]
impl ContractProxy for WbtcContract {
    fn address(&self) -> &str { &self.address }

    async fn balance_of(&self, owner: &str, sender: Option<&str>) -> Result<Amount, RpcError> {
        let data = Calldata::new(methods::BALANCE_OF).address(owner)?;
        let out = self.provider.call(&self.address, data.as_bytes(), sender).await?;
        AbiReader::new(&out.data).read_u256()
    }

    async fn total_supply(&self, sender: Option<&str>) -> Result<Amount, RpcError> {
        let data = Calldata::new(methods::TOTAL_SUPPLY);
        let out = self.provider.call(&self.address, data.as_bytes(), sender).await?;
        AbiReader::new(&out.data).read_u256()
    }

    async fn owner(&self, sender: Option<&str>) -> Result<String, RpcError> {
        let data = Calldata::new(methods::OWNER);
        let out = self.provider.call(&self.address, data.as_bytes(), sender).await?;
        AbiReader::new(&out.data).read_address()
    }

    async fn transfer(&self, to: &str, amount: &Amount, sender: Option<&str>) -> Result<TransferCall, RpcError> {
        let calldata = Calldata::new(methods::TRANSFER).address(to)?.u256(amount)?.into_bytes();
        let out = self.provider.call(&self.address, &calldata, sender).await?;
        tracing::debug!(contract = %self.address, %to, gas = ?out.estimated_gas, "transfer simulated");
        Ok(TransferCall { calldata, estimated_gas: out.estimated_gas })
    }
}
