use crate::contract::ContractProxy;
use crate::core::Amount;
use crate::error::TransferError;

/// Parse the requested amount and check `holder` can cover it. Returns the
/// required amount in base units.
pub async fn verify_balance(
    contract: &dyn ContractProxy,
    holder: &str,
    amount_text: &str,
) -> Result<Amount, TransferError> {
    let required = Amount::parse_btc(amount_text)?;
    let held = contract
        .balance_of(holder, Some(holder))
        .await
        .map_err(|e| TransferError::Query(e.to_string()))?;

    if held < required {
        tracing::info!(%holder, %held, %required, "balance below requested amount");
        return Err(TransferError::InsufficientBalance {
            held: held.to_btc_string(),
            requested: amount_text.to_string(),
        });
    }
    Ok(required)
}
