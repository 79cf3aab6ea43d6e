//! Pinata pinning backend for Birina.
//!
//! Wraps the `pinJSONToIPFS` endpoint. No retries and no idempotency:
//! repeated pins of identical content are the pinning service's problem to
//! deduplicate, not ours.

use async_trait::async_trait;
use birina::gateway::MetadataStore;
use birina::Error;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

const PIN_JSON_URL: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";

/// Client for the Pinata pinning API.
#[derive(Debug, Clone)]
pub struct PinataClient {
    http: reqwest::Client,
    api_key: String,
    secret_api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
}

impl PinataClient {
    /// Client with the given credentials.
    ///
    /// Empty credentials are accepted here and rejected per pin, so a
    /// service without pinning configured still starts and serves its other
    /// routes; the misconfiguration surfaces as a 500 on upload.
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    fn check_credentials(&self) -> Result<(), Error> {
        if self.api_key.is_empty() || self.secret_api_key.is_empty() {
            return Err(Error::Config("Pinata configuration missing".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PinataClient {
    #[instrument(skip_all)]
    async fn pin_json(&self, metadata: &Value) -> Result<String, Error> {
        self.check_credentials()?;

        let response = self
            .http
            .post(PIN_JSON_URL)
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_api_key)
            .json(metadata)
            .send()
            .await
            .map_err(|e| Error::MetadataUpload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Pinata rejected pin ({status}): {body}");
            return Err(Error::MetadataUpload(format!(
                "pinning service returned {status}"
            )));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| Error::MetadataUpload(e.to_string()))?;
        tracing::debug!("Pinned metadata at {}", pinned.ipfs_hash);
        Ok(pinned.ipfs_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_credentials_fail_before_any_request() {
        let client = PinataClient::new("", "");
        let err = client.pin_json(&serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn pin_response_field_name() {
        let pinned: PinResponse = serde_json::from_str(r#"{"IpfsHash":"Qm456"}"#).unwrap();
        assert_eq!(pinned.ipfs_hash, "Qm456");
    }
}
