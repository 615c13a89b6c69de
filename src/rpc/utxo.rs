//! UTXO funding: fetch spendable outputs for a set of addresses and keep the
//! prefix that satisfies the requested amount.

use async_trait::async_trait;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::core::paths::rpc as paths;
use crate::error::RpcError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    pub hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    #[serde(rename = "transactionId")]
    pub txid: String,
    #[serde(rename = "outputIndex")]
    pub vout: u32,
    #[serde(deserialize_with = "lenient_u64")]
    pub value: u64,
    #[serde(rename = "scriptPubKey")]
    pub script_pubkey: ScriptPubKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchUtxoParams {
    pub addresses: Vec<String>,
    /// Outputs below this value are ignored.
    pub min_amount: u64,
    /// Aggregate value the returned set must reach.
    pub requested_amount: u64,
}

/// Returns a set that reaches `requested_amount`, or an empty set. Errors
/// when the funds could not be looked up at all.
#[async_trait]
pub trait UtxoProvider: Send + Sync {
    async fn fetch_utxo_multi_addr(&self, params: &FetchUtxoParams) -> Result<Vec<Utxo>, RpcError>;
}

/// Keep outputs `>= min_amount` in order until the total reaches
/// `requested_amount`. Duplicate outpoints count once. Empty when the total
/// never gets there.
pub fn select_utxos(candidates: Vec<Utxo>, min_amount: u64, requested_amount: u64) -> Vec<Utxo> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    let mut total: u64 = 0;

    for utxo in candidates {
        if total >= requested_amount && !selected.is_empty() {
            break;
        }
        if utxo.value < min_amount || !seen.insert((utxo.txid.clone(), utxo.vout)) {
            continue;
        }
        total = total.saturating_add(utxo.value);
        selected.push(utxo);
    }

    if total < requested_amount || selected.is_empty() {
        return Vec::new();
    }
    selected
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UtxoListing {
    Flat(Vec<Utxo>),
    Split {
        #[serde(default)]
        confirmed: Vec<Utxo>,
        #[serde(default)]
        pending: Vec<Utxo>,
    },
}

impl UtxoListing {
    fn into_vec(self) -> Vec<Utxo> {
        match self {
            UtxoListing::Flat(all) => all,
            UtxoListing::Split { mut confirmed, pending } => {
                confirmed.extend(pending);
                confirmed
            }
        }
    }
}

/// UTXO listing from an OP_NET node's REST interface.
pub struct OpnetUtxoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpnetUtxoProvider {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), client: reqwest::Client::new() }
    }

    pub async fn fetch_utxo(&self, address: &str) -> Result<Vec<Utxo>, RpcError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, paths::UTXOS_PATH),
            &[("address", address), ("optimize", "true")],
        )
        .map_err(|e| RpcError::Encode(format!("utxo url: {e}")))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http { status, body });
        }
        let listing: UtxoListing = response.json().await?;
        Ok(listing.into_vec())
    }
}

#[async_trait]
impl UtxoProvider for OpnetUtxoProvider {
    async fn fetch_utxo_multi_addr(&self, params: &FetchUtxoParams) -> Result<Vec<Utxo>, RpcError> {
        let mut candidates = Vec::new();
        let mut answered = false;
        let mut last_error = None;
        for address in &params.addresses {
            match self.fetch_utxo(address).await {
                Ok(utxos) => {
                    answered = true;
                    candidates.extend(utxos);
                }
                Err(e) => {
                    tracing::warn!(%address, error = %e, "skipping address in UTXO fetch");
                    last_error = Some(e);
                }
            }
        }
        // Every address failed: the indexer is unreachable, not the wallet empty.
        if !answered {
            if let Some(e) = last_error {
                return Err(e);
            }
        }
        let selected = select_utxos(candidates, params.min_amount, params.requested_amount);
        tracing::debug!(count = selected.len(), "utxos selected");
        Ok(selected)
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().ok_or_else(|| de::Error::custom("expected unsigned integer")),
        Value::String(s) => s.parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected integer, got {}", other))),
    }
}
