//! Dual broadcast: the funding transaction, then the interaction transaction.
//!
//! ```text
//! Local:     Built → SignedPair → BroadcastA ──ok──► BroadcastB ──ok──► Done
//!                        │             │                  │
//!                        └─────────────┴──────────────────┴──► Failed
//!
//! Extension: Built → (wallet signs and broadcasts both) → confirm_pair
//! ```
//!
//! B is never submitted unless A was accepted. Nothing is retried and an
//! accepted A is not rolled back when B fails.

use std::sync::Arc;

use crate::error::TransferError;
use crate::rpc::{BroadcastResult, TransactionBroadcaster};
use crate::transfer::{TransferReceipt, ValidatedRequest};
use crate::wallet::{InteractionParameters, Signer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastStage {
    Built,
    SignedPair,
    BroadcastA,
    BroadcastB,
    Done,
    Failed,
}

/// Results for the two transactions, in order. Either may be missing when an
/// extension reports only part of the pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastPair {
    pub funding: Option<BroadcastResult>,
    pub interaction: Option<BroadcastResult>,
}

pub struct DualBroadcaster {
    provider: Arc<dyn TransactionBroadcaster>,
}

struct Attempt {
    stage: BroadcastStage,
}

impl Attempt {
    fn advance(&mut self, next: BroadcastStage) {
        tracing::debug!(from = ?self.stage, to = ?next, "broadcast stage");
        self.stage = next;
    }

    fn fail(&mut self, err: TransferError) -> TransferError {
        tracing::warn!(stage = ?self.stage, error = %err, "broadcast aborted");
        self.stage = BroadcastStage::Failed;
        err
    }
}

impl DualBroadcaster {
    pub fn new(provider: Arc<dyn TransactionBroadcaster>) -> Self { Self { provider } }

    pub async fn run(&self, signer: &Signer, params: &InteractionParameters) -> Result<BroadcastPair, TransferError> {
        match signer {
            Signer::Local(local) => {
                let mut attempt = Attempt { stage: BroadcastStage::Built };
                let signed = match local.sign_interaction(params).await {
                    Ok(Some(signed)) => signed,
                    Ok(None) => {
                        let err = TransferError::Signing("signer returned no transactions".into());
                        return Err(attempt.fail(err));
                    }
                    Err(e) => {
                        let err = TransferError::Signing(format!("{e:#}"));
                        return Err(attempt.fail(err));
                    }
                };
                attempt.advance(BroadcastStage::SignedPair);

                attempt.advance(BroadcastStage::BroadcastA);
                let funding = self.submit(&mut attempt, "funding", &signed.funding_tx).await?;

                attempt.advance(BroadcastStage::BroadcastB);
                let interaction = self.submit(&mut attempt, "interaction", &signed.interaction_tx).await?;

                attempt.advance(BroadcastStage::Done);
                Ok(BroadcastPair { funding: Some(funding), interaction: Some(interaction) })
            }
            Signer::Extension(ext) => {
                let (funding, interaction) = ext.sign_interaction(params).await?;
                Ok(BroadcastPair { funding, interaction })
            }
        }
    }

    async fn submit(
        &self,
        attempt: &mut Attempt,
        stage: &'static str,
        raw_tx: &str,
    ) -> Result<BroadcastResult, TransferError> {
        let result = self
            .provider
            .send_raw_transaction(raw_tx, false)
            .await
            .map_err(|e| attempt.fail(TransferError::Broadcast { stage, reason: e.to_string() }))?;
        if !result.is_accepted() {
            return Err(attempt.fail(TransferError::Broadcast { stage, reason: result.reason() }));
        }
        tracing::info!(stage, txid = result.txid().unwrap_or_default(), "transaction accepted");
        Ok(result)
    }
}

/// Success needs both results, both with a transaction id, and a non-zero
/// peer count on the second.
pub fn confirm_pair(pair: &BroadcastPair, request: &ValidatedRequest) -> Result<TransferReceipt, TransferError> {
    let (Some(funding), Some(interaction)) = (&pair.funding, &pair.interaction) else {
        return Err(TransferError::IncompleteBroadcast);
    };
    match (funding.txid(), interaction.txid(), interaction.peers) {
        (Some(funding_txid), Some(txid), Some(peers)) if peers > 0 => Ok(TransferReceipt {
            amount: request.amount_text.clone(),
            to: request.to.clone(),
            funding_txid: funding_txid.to_string(),
            txid: txid.to_string(),
            peers,
        }),
        _ => Err(TransferError::IncompleteBroadcast),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(txid: &str, peers: Option<u32>) -> BroadcastResult {
        BroadcastResult { success: true, result: Some(txid.into()), error: None, peers }
    }

    fn request() -> ValidatedRequest {
        ValidatedRequest { amount_text: "0.5".into(), to: "bcrt1pdest".into() }
    }

    #[test]
    fn complete_pair_yields_receipt() {
        let pair = BroadcastPair { funding: Some(accepted("aa", None)), interaction: Some(accepted("bb", Some(2))) };
        let receipt = confirm_pair(&pair, &request()).unwrap();
        assert_eq!(receipt.funding_txid, "aa");
        assert_eq!(receipt.txid, "bb");
        assert!(receipt.message().ends_with("Transaction ID: bb. Broadcasted to 3 peer(s)."));
    }

    #[test]
    fn missing_peer_count_is_incomplete() {
        let pair = BroadcastPair { funding: Some(accepted("aa", Some(1))), interaction: Some(accepted("bb", None)) };
        assert!(matches!(confirm_pair(&pair, &request()), Err(TransferError::IncompleteBroadcast)));
    }

    #[test]
    fn empty_txid_is_incomplete() {
        let pair = BroadcastPair { funding: Some(accepted("", None)), interaction: Some(accepted("bb", Some(1))) };
        assert!(matches!(confirm_pair(&pair, &request()), Err(TransferError::IncompleteBroadcast)));
        assert!(matches!(confirm_pair(&BroadcastPair::default(), &request()), Err(TransferError::IncompleteBroadcast)));
    }

    #[test]
    fn zero_peers_is_incomplete() {
        let pair = BroadcastPair { funding: Some(accepted("aa", Some(3))), interaction: Some(accepted("bb", Some(0))) };
        assert!(matches!(confirm_pair(&pair, &request()), Err(TransferError::IncompleteBroadcast)));
    }
}
