//! JsonRpcProvider - OP_NET node methods over JSON-RPC

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::paths::rpc as paths;
use crate::error::RpcError;
use crate::rpc::JsonRpcClient;

/// Node verdict for one submitted transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peers: Option<u32>,
}

impl BroadcastResult {
    /// Transaction id, when the node returned a non-empty one.
    pub fn txid(&self) -> Option<&str> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }

    pub fn is_accepted(&self) -> bool { self.txid().is_some() }

    pub fn reason(&self) -> String {
        self.error.clone().unwrap_or_else(|| "no transaction id returned".to_string())
    }
}

/// Submits raw transactions to the network.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    async fn send_raw_transaction(&self, raw_tx: &str, psbt: bool) -> Result<BroadcastResult, RpcError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCallResult {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    revert: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    estimated_gas: Option<Value>,
}

/// Decoded output of a simulated contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutput {
    pub data: Vec<u8>,
    pub estimated_gas: Option<u64>,
}

pub struct JsonRpcProvider {
    rpc: JsonRpcClient,
}

impl JsonRpcProvider {
    /// `base_url` is the node root, e.g. `https://regtest.opnet.org`.
    pub fn new(base_url: &str) -> Self {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), paths::JSON_RPC_PATH);
        Self { rpc: JsonRpcClient::new(endpoint) }
    }

    pub fn endpoint(&self) -> &str { self.rpc.endpoint() }

    /// Simulate a contract call. A revert or error marker in the response is
    /// returned as [`RpcError::Revert`].
    pub async fn call(&self, to: &str, calldata: &[u8], from: Option<&str>) -> Result<CallOutput, RpcError> {
        let params = vec![json!(to), json!(hex::encode(calldata)), json!(from)];
        let raw: RawCallResult = self.rpc.request(paths::CALL, params).await?;

        if let Some(reason) = raw.revert.or(raw.error) {
            return Err(RpcError::Revert(reason));
        }

        let data = match raw.result.as_deref() {
            Some(encoded) if !encoded.is_empty() => base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| RpcError::Decode(format!("call result: {e}")))?,
            _ => Vec::new(),
        };

        Ok(CallOutput { data, estimated_gas: raw.estimated_gas.as_ref().and_then(parse_gas) })
    }
}

#[async_trait]
impl TransactionBroadcaster for JsonRpcProvider {
    async fn send_raw_transaction(&self, raw_tx: &str, psbt: bool) -> Result<BroadcastResult, RpcError> {
        let result: BroadcastResult = self
            .rpc
            .request(paths::SEND_RAW_TRANSACTION, vec![json!(raw_tx), json!(psbt)])
            .await?;
        tracing::debug!(accepted = result.is_accepted(), peers = ?result.peers, "raw transaction submitted");
        Ok(result)
    }
}

fn parse_gas(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex_digits) => u64::from_str_radix(hex_digits, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_accepts_numbers_and_strings() {
        assert_eq!(parse_gas(&json!(21000)), Some(21000));
        assert_eq!(parse_gas(&json!("0x5208")), Some(21000));
        assert_eq!(parse_gas(&json!("21000")), Some(21000));
        assert_eq!(parse_gas(&json!(null)), None);
    }

    #[test]
    fn empty_result_is_not_accepted() {
        let r = BroadcastResult { success: true, result: Some(String::new()), error: None, peers: Some(3) };
        assert!(!r.is_accepted());
        assert_eq!(r.reason(), "no transaction id returned");
    }

    #[test]
    fn endpoint_appends_json_rpc_path() {
        let provider = JsonRpcProvider::new("https://regtest.opnet.org/");
        assert_eq!(provider.endpoint(), "https://regtest.opnet.org/api/v1/json-rpc");
    }
}
