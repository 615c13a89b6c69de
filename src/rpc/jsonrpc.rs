use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::RpcError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: u64) -> Self {
        Self { jsonrpc: "2.0".to_string(), method: method.into(), params, id: Value::from(id) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    Error {
        #[serde(default)]
        jsonrpc: String,
        error: JsonRpcError,
        #[serde(default)]
        id: Value,
    },
    Success {
        #[serde(default)]
        jsonrpc: String,
        result: Value,
        #[serde(default)]
        id: Value,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(result: Value, id: Value) -> Self {
        Self::Success { jsonrpc: "2.0".to_string(), result, id }
    }

    pub fn error(code: i64, message: String, id: Value) -> Self {
        Self::Error { jsonrpc: "2.0".to_string(), error: JsonRpcError { code, message, data: None }, id }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            JsonRpcResponse::Success { result, .. } => Ok(result),
            JsonRpcResponse::Error { error, .. } => Err(RpcError::Rpc { code: error.code, message: error.message }),
        }
    }
}

/// JSON-RPC 2.0 over HTTP POST. One request per call, no batching.
pub struct JsonRpcClient {
    endpoint: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self { endpoint: endpoint.into(), client, next_id: AtomicU64::new(1) }
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(method, params, id);
        tracing::debug!(method, id, endpoint = %self.endpoint, "json-rpc request");

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http { status, body });
        }

        let envelope: JsonRpcResponse = response.json().await?;
        let result = envelope.into_result()?;
        serde_json::from_value(result).map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }
}
