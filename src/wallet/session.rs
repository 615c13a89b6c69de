//! WalletSession - the connected account and the sender the contract is bound to

use serde::Serialize;
use tokio::sync::RwLock;

use super::Signer;
use crate::error::TransferError;
use crate::network::{AddressValidator, Network};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionBinding {
    /// First account the wallet reported.
    pub account: String,
    /// Taproot account on the active network, used as the call sender.
    pub sender: Option<String>,
    /// Every account the wallet reported; UTXOs are drawn from all of them.
    pub addresses: Vec<String>,
}

pub struct WalletSession {
    network: Network,
    signer: Option<Signer>,
    binding: RwLock<Option<SessionBinding>>,
}

impl WalletSession {
    pub fn new(network: Network, signer: Option<Signer>) -> Self {
        Self { network, signer, binding: RwLock::new(None) }
    }

    pub fn network(&self) -> Network { self.network }
    pub fn signer(&self) -> Option<&Signer> { self.signer.as_ref() }

    /// Ask the wallet for its accounts and rebind. The only writer of the binding.
    pub async fn connect(&self, validator: &dyn AddressValidator) -> Result<SessionBinding, TransferError> {
        let signer = self.signer.as_ref().ok_or(TransferError::NoWallet)?;
        let accounts = signer.request_accounts().await?;
        let account = accounts
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("wallet returned no accounts"))?;
        let sender = accounts.iter().find(|a| validator.is_valid_p2tr(a, self.network)).cloned();

        let binding = SessionBinding { account, sender, addresses: accounts };
        tracing::info!(
            account = %binding.account,
            sender = ?binding.sender,
            signer = signer.kind(),
            "wallet connected"
        );
        *self.binding.write().await = Some(binding.clone());
        Ok(binding)
    }

    pub async fn binding(&self) -> Option<SessionBinding> {
        self.binding.read().await.clone()
    }

    /// Current binding, connecting first if there is none.
    pub async fn ensure_connected(&self, validator: &dyn AddressValidator) -> Result<SessionBinding, TransferError> {
        if self.signer.is_none() {
            return Err(TransferError::NoWallet);
        }
        match self.binding().await {
            Some(binding) => Ok(binding),
            None => self.connect(validator).await,
        }
    }

    pub async fn disconnect(&self) {
        *self.binding.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_addresses::{p2tr, p2wpkh};
    use crate::network::NetworkAddressValidator;
    use crate::wallet::{InteractionParameters, LocalSigner, SignedInteraction};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Accounts(Vec<String>, AtomicUsize);

    #[async_trait]
    impl LocalSigner for Accounts {
        async fn request_accounts(&self) -> anyhow::Result<Vec<String>> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(self.0.clone())
        }
        async fn sign_interaction(&self, _: &InteractionParameters) -> anyhow::Result<Option<SignedInteraction>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn sender_is_first_taproot_account() {
        let segwit = p2wpkh(1, Network::Regtest);
        let taproot = p2tr(1, Network::Regtest);
        let signer = Arc::new(Accounts(vec![segwit.clone(), taproot.clone()], AtomicUsize::new(0)));
        let session = WalletSession::new(Network::Regtest, Some(Signer::Local(signer)));

        let binding = session.connect(&NetworkAddressValidator).await.unwrap();
        assert_eq!(binding.account, segwit);
        assert_eq!(binding.sender.as_deref(), Some(taproot.as_str()));
        assert_eq!(binding.addresses.len(), 2);
    }

    #[tokio::test]
    async fn foreign_network_account_leaves_sender_unbound() {
        let signer = Arc::new(Accounts(vec![p2tr(2, Network::Bitcoin)], AtomicUsize::new(0)));
        let session = WalletSession::new(Network::Regtest, Some(Signer::Local(signer)));
        assert_eq!(session.connect(&NetworkAddressValidator).await.unwrap().sender, None);
    }

    #[tokio::test]
    async fn ensure_connected_reuses_binding() {
        let signer = Arc::new(Accounts(vec![p2tr(3, Network::Regtest)], AtomicUsize::new(0)));
        let session = WalletSession::new(Network::Regtest, Some(Signer::Local(signer.clone())));
        session.ensure_connected(&NetworkAddressValidator).await.unwrap();
        session.ensure_connected(&NetworkAddressValidator).await.unwrap();
        assert_eq!(signer.1.load(Ordering::SeqCst), 1);

        session.disconnect().await;
        assert!(session.binding().await.is_none());
    }

    #[tokio::test]
    async fn no_signer_is_no_wallet() {
        let session = WalletSession::new(Network::Regtest, None);
        assert!(matches!(session.connect(&NetworkAddressValidator).await, Err(TransferError::NoWallet)));
        assert!(matches!(session.ensure_connected(&NetworkAddressValidator).await, Err(TransferError::NoWallet)));
    }
}
