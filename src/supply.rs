//! SupplyWatcher - periodic total-supply refresh

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::contract::ContractProxy;
use crate::core::messages;
use crate::core::Amount;
use crate::error::RpcError;
use crate::runtime::Shutdown;

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplySnapshot {
    pub total_supply: Amount,
    pub fetched_at: DateTime<Utc>,
}

impl SupplySnapshot {
    pub fn formatted(&self) -> String { self.total_supply.to_btc_string() }
}

pub struct SupplyWatcher {
    contract: Arc<dyn ContractProxy>,
    interval: Duration,
    latest: RwLock<Option<SupplySnapshot>>,
}

impl SupplyWatcher {
    pub fn new(contract: Arc<dyn ContractProxy>, interval: Duration) -> Self {
        Self { contract, interval, latest: RwLock::new(None) }
    }

    pub fn interval(&self) -> Duration { self.interval }

    pub async fn latest(&self) -> Option<SupplySnapshot> {
        self.latest.read().await.clone()
    }

    /// Query once. A failure keeps the previous snapshot.
    pub async fn refresh(&self) -> Result<SupplySnapshot, RpcError> {
        match self.contract.total_supply(None).await {
            Ok(total_supply) => {
                let snapshot = SupplySnapshot { total_supply, fetched_at: Utc::now() };
                tracing::debug!(supply = %snapshot.formatted(), "total supply refreshed");
                *self.latest.write().await = Some(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "{}", messages::SUPPLY_FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// Refresh now, then every `interval`, until shutdown.
    pub async fn run(&self, shutdown: Shutdown) {
        loop {
            let _ = self.refresh().await;
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.wait() => break,
            }
        }
        tracing::debug!("supply watcher stopped");
    }

    pub fn spawn(self: Arc<Self>, shutdown: Shutdown) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}
