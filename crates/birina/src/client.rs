//! HTTP client for the Birina proxy endpoints.
//!
//! Implements the workflow-facing gateway traits over the two routes served
//! by `birinad`, so a session running next to the service consumes exactly
//! the wire contract a browser client would.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::gateway::{ClaimRegistry, MetadataUploader};
use crate::metadata::MintMetadata;
use crate::types::{ClaimCheck, TokenUri};
use crate::Error;

/// Client for the `check-status` and `upload-metadata` routes.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client against the given service base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid service URL: {e}")))
    }
}

#[async_trait]
impl ClaimRegistry for HttpClient {
    async fn is_claimed(&self, gamusa_id: &str) -> Result<bool, Error> {
        let url = self.endpoint("check-status")?;
        let response = self
            .inner
            .get(url)
            .query(&[("id", gamusa_id)])
            .send()
            .await
            .map_err(|e| Error::StatusCheck(e.to_string()))?;

        if !response.status().is_success() {
            // error payloads carry a message field
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(String::from))
                .unwrap_or_else(|| "Failed to verify Gamusa status".to_string());
            return Err(Error::StatusCheck(message));
        }

        let check: ClaimCheck = response
            .json()
            .await
            .map_err(|e| Error::StatusCheck(e.to_string()))?;
        Ok(check.is_claimed)
    }
}

#[async_trait]
impl MetadataUploader for HttpClient {
    async fn upload_metadata(&self, metadata: &MintMetadata) -> Result<TokenUri, Error> {
        let url = self.endpoint("upload-metadata")?;
        let response = self
            .inner
            .post(url)
            .json(&serde_json::json!({ "metadata": metadata }))
            .send()
            .await
            .map_err(|e| Error::MetadataUpload(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|_| Error::MetadataUpload("Invalid API response format".to_string()))?;

        let success = body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !status.is_success() || !success {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(Error::MetadataUpload(reason));
        }

        let token_uri = body
            .get("tokenURI")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MetadataUpload("Invalid API response format".to_string()))?;
        Ok(TokenUri::from(token_uri.to_string()))
    }
}
