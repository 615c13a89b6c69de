use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// What the user typed: a decimal token amount and a destination address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub to: String,
}

impl TransferRequest {
    pub fn new(amount: impl Into<String>, to: impl Into<String>) -> Self {
        Self { amount: amount.into(), to: to.into() }
    }
}

/// Both transactions accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    /// Amount as the user entered it.
    pub amount: String,
    pub to: String,
    pub funding_txid: String,
    pub txid: String,
    pub peers: u32,
}

impl TransferReceipt {
    pub fn message(&self) -> String {
        format!(
            "Successfully transferred {} wBTC to {}. Transaction ID: {}. Broadcasted to {} peer(s).",
            self.amount,
            self.to,
            self.txid,
            self.peers.saturating_add(1)
        )
    }
}

/// User-visible outcome of one confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub success: bool,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self { Self { message: message.into(), success: true } }
    pub fn failure(message: impl Into<String>) -> Self { Self { message: message.into(), success: false } }
}

impl From<&Result<TransferReceipt, TransferError>> for Feedback {
    fn from(outcome: &Result<TransferReceipt, TransferError>) -> Self {
        match outcome {
            Ok(receipt) => Feedback::success(receipt.message()),
            Err(e) => Feedback::failure(e.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_message_counts_self_as_peer() {
        let receipt = TransferReceipt {
            amount: "0.5".into(),
            to: "bcrt1pdest".into(),
            funding_txid: "aa".into(),
            txid: "bb".into(),
            peers: 4,
        };
        assert_eq!(
            receipt.message(),
            "Successfully transferred 0.5 wBTC to bcrt1pdest. Transaction ID: bb. Broadcasted to 5 peer(s)."
        );
    }

    #[test]
    fn error_becomes_failed_feedback() {
        let fb = Feedback::from(&Err(TransferError::InsufficientUtxos));
        assert_eq!(fb, Feedback::failure("Insufficient funds."));
    }
}
