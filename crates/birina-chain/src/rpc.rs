//! Minimal JSON-RPC 2.0 client.
//!
//! Covers exactly the handful of methods the backends need; anything beyond
//! request/response plumbing (signing, gas, nonces) belongs to the injected
//! wallet capabilities.

use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::ChainError;

/// JSON-RPC client over HTTP.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcClient {
    /// Client against the given node or bundler endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Issue one JSON-RPC call, returning the raw result value.
    ///
    /// A `null` result is returned as `Value::Null`; some methods (receipt
    /// lookups) use it to mean "not yet".
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        tracing::trace!("rpc request: {method}");
        let response: RpcResponse = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result)
    }

    /// `eth_call` against `to` with the given call data at the latest block.
    pub async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            "latest",
        ]);
        let result = self.call("eth_call", params).await?;
        decode_hex_blob(&result)
    }

    /// Broadcast raw signed transaction bytes, returning the transaction
    /// hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<String, ChainError> {
        let result = self
            .call(
                "eth_sendRawTransaction",
                json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or(ChainError::MissingResult)
    }

    /// Look up a receipt by hash; `None` while the submission is pending.
    ///
    /// `method` is `eth_getTransactionReceipt` for transactions and
    /// `eth_getUserOperationReceipt` for user operations.
    pub async fn get_receipt(
        &self,
        method: &str,
        hash: &str,
    ) -> Result<Option<Value>, ChainError> {
        let result = self.call(method, json!([hash])).await?;
        if result.is_null() {
            Ok(None)
        } else {
            Ok(Some(result))
        }
    }
}

fn decode_hex_blob(value: &Value) -> Result<Vec<u8>, ChainError> {
    let text = value.as_str().ok_or(ChainError::MissingResult)?;
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(stripped).map_err(|e| ChainError::MalformedHex(e.to_string()))
}
