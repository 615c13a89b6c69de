use crate::contract::{ContractProxy, TransferCall};
use crate::core::Amount;
use crate::error::{RpcError, TransferError};
use crate::network::Network;
use crate::rpc::Utxo;
use crate::wallet::InteractionParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    /// sat/vB
    pub fee_rate: u64,
    pub priority_fee: u64,
}

impl Default for FeePolicy {
    fn default() -> Self { Self { fee_rate: 450, priority_fee: 10_000 } }
}

/// Simulate `transfer(to, amount)` as `sender`. A contract revert surfaces
/// its text unchanged.
pub async fn simulate_transfer(
    contract: &dyn ContractProxy,
    to: &str,
    amount: &Amount,
    sender: &str,
) -> Result<TransferCall, TransferError> {
    match contract.transfer(to, amount, Some(sender)).await {
        Ok(call) if call.calldata.is_empty() => Err(TransferError::MissingCalldata),
        Ok(call) => {
            tracing::info!(estimated_gas = ?call.estimated_gas, "transfer simulation passed");
            Ok(call)
        }
        Err(RpcError::Revert(reason)) => Err(TransferError::Simulation(reason)),
        Err(e) => Err(TransferError::Query(e.to_string())),
    }
}

pub fn build_parameters(
    from: &str,
    contract: &str,
    utxos: Vec<Utxo>,
    network: Network,
    fees: FeePolicy,
    calldata: Vec<u8>,
) -> InteractionParameters {
    InteractionParameters {
        from: from.to_string(),
        to: contract.to_string(),
        utxos,
        network,
        fee_rate: fees.fee_rate,
        priority_fee: fees.priority_fee,
        calldata,
    }
}
