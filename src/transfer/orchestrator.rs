//! TransferOrchestrator - one confirm, start to finish

use std::sync::Arc;
use tokio::sync::Mutex;

use super::balance::verify_balance;
use super::broadcast::{confirm_pair, DualBroadcaster};
use super::builder::{build_parameters, simulate_transfer, FeePolicy};
use super::funding::fetch_utxos;
use super::validate::validate_request;
use super::{Feedback, TransferReceipt, TransferRequest};
use crate::contract::ContractProxy;
use crate::error::TransferError;
use crate::network::AddressValidator;
use crate::rpc::{TransactionBroadcaster, UtxoProvider};
use crate::wallet::WalletSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSettings {
    pub fees: FeePolicy,
    pub utxo_min_amount: u64,
    pub utxo_requested_amount: u64,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self { fees: FeePolicy::default(), utxo_min_amount: 10_000, utxo_requested_amount: 100_000 }
    }
}

pub struct TransferOrchestrator {
    session: Arc<WalletSession>,
    contract: Arc<dyn ContractProxy>,
    utxos: Arc<dyn UtxoProvider>,
    validator: Arc<dyn AddressValidator>,
    broadcaster: DualBroadcaster,
    settings: TransferSettings,
    in_flight: Mutex<()>,
}

impl TransferOrchestrator {
    pub fn new(
        session: Arc<WalletSession>,
        contract: Arc<dyn ContractProxy>,
        utxos: Arc<dyn UtxoProvider>,
        provider: Arc<dyn TransactionBroadcaster>,
        validator: Arc<dyn AddressValidator>,
        settings: TransferSettings,
    ) -> Self {
        Self {
            session,
            contract,
            utxos,
            validator,
            broadcaster: DualBroadcaster::new(provider),
            settings,
            in_flight: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Arc<WalletSession> { &self.session }

    /// Run one attempt. Fails fast with `Busy` if another is in flight.
    pub async fn execute(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let _guard = self.in_flight.try_lock().map_err(|_| TransferError::Busy)?;
        self.run(request).await
    }

    /// Same as [`execute`](Self::execute), reported as user feedback. Never errors.
    pub async fn confirm(&self, request: &TransferRequest) -> Feedback {
        let outcome = self.execute(request).await;
        match &outcome {
            Ok(receipt) => tracing::info!(txid = %receipt.txid, to = %receipt.to, "transfer complete"),
            Err(e) => tracing::warn!(error = %e, "transfer failed"),
        }
        Feedback::from(&outcome)
    }

    async fn run(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        let network = self.session.network();
        let validated = validate_request(request, network, self.validator.as_ref())?;

        let binding = self.session.ensure_connected(self.validator.as_ref()).await?;
        let signer = self.session.signer().ok_or(TransferError::NoWallet)?;
        let sender = binding.sender.as_deref().ok_or(TransferError::WrongNetwork)?;

        let required = verify_balance(self.contract.as_ref(), sender, &validated.amount_text).await?;

        let utxos = fetch_utxos(
            self.utxos.as_ref(),
            &binding.addresses,
            self.settings.utxo_min_amount,
            self.settings.utxo_requested_amount,
        )
        .await?;

        let call = simulate_transfer(self.contract.as_ref(), &validated.to, &required, sender).await?;
        let params =
            build_parameters(sender, self.contract.address(), utxos, network, self.settings.fees, call.calldata);

        let pair = self.broadcaster.run(signer, &params).await?;
        confirm_pair(&pair, &validated)
    }
}
