use crate::error::TransferError;
use crate::rpc::{FetchUtxoParams, Utxo, UtxoProvider};

/// Funding inputs for one attempt. An empty set ends the attempt; there is
/// no retry and no partial fill.
pub async fn fetch_utxos(
    provider: &dyn UtxoProvider,
    addresses: &[String],
    min_amount: u64,
    requested_amount: u64,
) -> Result<Vec<Utxo>, TransferError> {
    let params = FetchUtxoParams { addresses: addresses.to_vec(), min_amount, requested_amount };
    let utxos = provider
        .fetch_utxo_multi_addr(&params)
        .await
        .map_err(|e| TransferError::Query(e.to_string()))?;
    if utxos.is_empty() {
        tracing::info!(addresses = ?params.addresses, requested_amount, "no utxo set covers the request");
        return Err(TransferError::InsufficientUtxos);
    }
    Ok(utxos)
}
