use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use detective_core::model::Address;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::abi::{decode_hex, parse_quantity};
use crate::error::{ChainError, RpcError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared HTTP client with the request timeout used by every outbound call.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Minimal Ethereum JSON-RPC client.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(http_client(), url)
    }

    #[must_use]
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and decode its `result`.
    ///
    /// # Errors
    ///
    /// Returns `RpcError` for transport failures, non-2xx statuses, node-side
    /// errors, or results that do not match `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(method, id, url = %self.url, "rpc call");

        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::HttpStatus(response.status()));
        }

        let body: RpcResponse = response.json().await?;
        body.into_result()
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcResponse {
    pub(crate) fn into_result<T: DeserializeOwned>(self) -> Result<T, RpcError> {
        if let Some(err) = self.error {
            let data = err.data.map(|value| match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
                data,
            });
        }
        let result = self.result.ok_or(RpcError::EmptyResponse)?;
        serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))
    }
}

/// Read-only chain queries used by the analysis tool.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Deployed bytecode at `address`; empty for externally owned accounts.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the node cannot be queried.
    async fn code_at(&self, address: Address) -> Result<Vec<u8>, ChainError>;

    /// Balance in wei.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` if the node cannot be queried.
    async fn balance_of(&self, address: Address) -> Result<u128, ChainError>;
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn code_at(&self, address: Address) -> Result<Vec<u8>, ChainError> {
        let raw: String = self
            .call("eth_getCode", json!([address.to_lower_hex(), "latest"]))
            .await?;
        Ok(decode_hex(&raw)?)
    }

    async fn balance_of(&self, address: Address) -> Result<u128, ChainError> {
        let raw: String = self
            .call("eth_getBalance", json!([address.to_lower_hex(), "latest"]))
            .await?;
        Ok(parse_quantity(&raw)?)
    }
}
