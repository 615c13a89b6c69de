//! WalletBridge - JSON-RPC client for a local wallet process

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use super::{InteractionParameters, LocalSigner, SignedInteraction, Signer, WalletExtension};
use crate::core::paths::bridge as paths;
use crate::rpc::{BroadcastResult, JsonRpcClient};

pub struct WalletBridge {
    rpc: JsonRpcClient,
}

impl WalletBridge {
    pub fn new(url: impl Into<String>) -> Self { Self { rpc: JsonRpcClient::new(url) } }

    pub fn url(&self) -> &str { self.rpc.endpoint() }

    pub async fn capabilities(&self) -> Result<Vec<String>> {
        self.rpc.request(paths::CAPABILITIES, vec![]).await.context("wallet bridge capabilities")
    }

    async fn accounts(&self) -> Result<Vec<String>> {
        self.rpc.request(paths::REQUEST_ACCOUNTS, vec![]).await.context("wallet bridge accounts")
    }

    fn params_value(params: &InteractionParameters) -> Result<serde_json::Value> {
        serde_json::to_value(params).context("encode interaction parameters")
    }
}

#[async_trait]
impl LocalSigner for WalletBridge {
    async fn request_accounts(&self) -> Result<Vec<String>> { self.accounts().await }

    async fn sign_interaction(&self, params: &InteractionParameters) -> Result<Option<SignedInteraction>> {
        let value = Self::params_value(params)?;
        self.rpc.request(paths::SIGN_INTERACTION, vec![value]).await.context("wallet bridge signing")
    }
}

#[async_trait]
impl WalletExtension for WalletBridge {
    async fn request_accounts(&self) -> Result<Vec<String>> { self.accounts().await }

    async fn sign_interaction(
        &self,
        params: &InteractionParameters,
    ) -> Result<(Option<BroadcastResult>, Option<BroadcastResult>)> {
        let value = Self::params_value(params)?;
        let results: Vec<Option<BroadcastResult>> = self
            .rpc
            .request(paths::WEB3_SIGN_INTERACTION, vec![value])
            .await
            .context("wallet bridge web3 signing")?;
        let mut results = results.into_iter();
        Ok((results.next().flatten(), results.next().flatten()))
    }
}

impl Signer {
    /// Pick the signing path once: wallets that advertise `web3` sign and
    /// broadcast themselves, others return raw transactions.
    pub async fn detect(bridge: Arc<WalletBridge>) -> Result<Self> {
        let caps = bridge.capabilities().await?;
        let url = bridge.url().to_string();
        let signer = if caps.iter().any(|c| c == paths::WEB3_CAPABILITY) {
            Signer::Extension(bridge)
        } else {
            Signer::Local(bridge)
        };
        tracing::info!(%url, kind = signer.kind(), "wallet bridge signer selected");
        Ok(signer)
    }
}
