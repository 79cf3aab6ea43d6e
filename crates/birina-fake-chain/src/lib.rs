//! Fake chain and pinning backends for tests.
//!
//! Scriptable in-memory implementations of the Birina gateway traits: a
//! claim registry backed by a hash set, a deterministic pinning store, and a
//! transaction submitter with configurable failures and receipt delay. Used
//! by the integration tests the way a fake payment backend stands in for a
//! real node.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use birina::gateway::{ClaimRegistry, MetadataStore, MetadataUploader, TransactionSubmitter};
use birina::types::{PendingClaim, ScanRecord, TokenUri, TransactionOutcome};
use birina::{Error, MintMetadata};
use serde_json::Value;
use sha3::{Digest, Keccak256};

/// QR payload for a well-formed fake scan of `gamusa_id`.
pub fn fake_scan_payload(gamusa_id: &str) -> String {
    serde_json::json!({
        "gamusaId": gamusa_id,
        "location": "Sualkuchi",
        "imageHash": "Qm123",
    })
    .to_string()
}

/// In-memory claim registry.
#[derive(Default)]
pub struct FakeClaimRegistry {
    claimed: Mutex<HashSet<String>>,
    fail_with: Mutex<Option<String>>,
    checks: Mutex<Vec<String>>,
}

impl FakeClaimRegistry {
    /// Empty registry: every identifier reads unclaimed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier as already claimed.
    pub fn mark_claimed(&self, gamusa_id: &str) {
        self.claimed
            .lock()
            .expect("poisoned")
            .insert(gamusa_id.to_string());
    }

    /// Make every subsequent read fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().expect("poisoned") = Some(message.to_string());
    }

    /// Clear a scripted failure.
    pub fn clear_failure(&self) {
        *self.fail_with.lock().expect("poisoned") = None;
    }

    /// Identifiers that have been queried, in order.
    pub fn checks(&self) -> Vec<String> {
        self.checks.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl ClaimRegistry for FakeClaimRegistry {
    async fn is_claimed(&self, gamusa_id: &str) -> Result<bool, Error> {
        if let Some(message) = self.fail_with.lock().expect("poisoned").clone() {
            return Err(Error::StatusCheck(message));
        }
        self.checks
            .lock()
            .expect("poisoned")
            .push(gamusa_id.to_string());
        Ok(self.claimed.lock().expect("poisoned").contains(gamusa_id))
    }
}

/// Deterministic in-memory pinning store.
///
/// The content hash is derived from the pinned JSON, so identical documents
/// pin to identical addresses; a fixed hash can be scripted for tests that
/// assert a specific token URI.
#[derive(Default)]
pub struct FakePinning {
    fail_with: Mutex<Option<String>>,
    fixed_hash: Mutex<Option<String>>,
    pinned: Mutex<Vec<Value>>,
}

impl FakePinning {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin everything at the given hash instead of deriving one.
    pub fn use_fixed_hash(&self, hash: &str) {
        *self.fixed_hash.lock().expect("poisoned") = Some(hash.to_string());
    }

    /// Make every subsequent pin fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().expect("poisoned") = Some(message.to_string());
    }

    /// Clear a scripted failure.
    pub fn clear_failure(&self) {
        *self.fail_with.lock().expect("poisoned") = None;
    }

    /// Documents pinned so far, in order.
    pub fn pinned(&self) -> Vec<Value> {
        self.pinned.lock().expect("poisoned").clone()
    }

    fn derive_hash(value: &Value) -> String {
        let mut hasher = Keccak256::new();
        hasher.update(value.to_string().as_bytes());
        format!("Qm{}", hex::encode(&hasher.finalize()[..16]))
    }
}

#[async_trait]
impl MetadataStore for FakePinning {
    async fn pin_json(&self, metadata: &Value) -> Result<String, Error> {
        if let Some(message) = self.fail_with.lock().expect("poisoned").clone() {
            return Err(Error::MetadataUpload(message));
        }
        self.pinned.lock().expect("poisoned").push(metadata.clone());
        let hash = self
            .fixed_hash
            .lock()
            .expect("poisoned")
            .clone()
            .unwrap_or_else(|| Self::derive_hash(metadata));
        Ok(hash)
    }
}

#[async_trait]
impl MetadataUploader for FakePinning {
    async fn upload_metadata(&self, metadata: &MintMetadata) -> Result<TokenUri, Error> {
        let value = serde_json::to_value(metadata)
            .map_err(|e| Error::MetadataUpload(e.to_string()))?;
        let hash = self.pin_json(&value).await?;
        Ok(TokenUri::from_ipfs_hash(&hash))
    }
}

/// A claim recorded by the fake submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedClaim {
    /// Identifier that was claimed
    pub gamusa_id: String,
    /// Location passed through to the contract
    pub location: String,
    /// Token URI passed through to the contract
    pub token_uri: String,
}

/// Scriptable transaction submitter.
pub struct FakeSubmitter {
    account: String,
    transaction_hash: Mutex<String>,
    fail_submit: Mutex<Option<String>>,
    fail_receipt: Mutex<Option<String>>,
    receipt_delay: Mutex<Option<Duration>>,
    submissions: Mutex<Vec<SubmittedClaim>>,
}

impl Default for FakeSubmitter {
    fn default() -> Self {
        Self {
            account: "0x00000000000000000000000000000000000f4ce5".to_string(),
            transaction_hash: Mutex::new("0xabc".to_string()),
            fail_submit: Mutex::new(None),
            fail_receipt: Mutex::new(None),
            receipt_delay: Mutex::new(None),
            submissions: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSubmitter {
    /// Submitter that confirms every claim at hash `0xabc`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash the next receipt reports.
    pub fn use_transaction_hash(&self, hash: &str) {
        *self.transaction_hash.lock().expect("poisoned") = hash.to_string();
    }

    /// Make every subsequent submission fail with `message`.
    pub fn fail_submit_with(&self, message: &str) {
        *self.fail_submit.lock().expect("poisoned") = Some(message.to_string());
    }

    /// Make every subsequent receipt wait fail with `message`.
    pub fn fail_receipt_with(&self, message: &str) {
        *self.fail_receipt.lock().expect("poisoned") = Some(message.to_string());
    }

    /// Clear scripted failures.
    pub fn clear_failures(&self) {
        *self.fail_submit.lock().expect("poisoned") = None;
        *self.fail_receipt.lock().expect("poisoned") = None;
    }

    /// Delay each receipt by `delay`, for timeout tests.
    pub fn delay_receipt(&self, delay: Duration) {
        *self.receipt_delay.lock().expect("poisoned") = Some(delay);
    }

    /// Claims submitted so far, in order.
    pub fn submissions(&self) -> Vec<SubmittedClaim> {
        self.submissions.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl TransactionSubmitter for FakeSubmitter {
    fn account(&self) -> &str {
        &self.account
    }

    async fn submit_claim(
        &self,
        record: &ScanRecord,
        token_uri: &TokenUri,
    ) -> Result<PendingClaim, Error> {
        if let Some(message) = self.fail_submit.lock().expect("poisoned").clone() {
            return Err(Error::Transaction(message));
        }
        self.submissions.lock().expect("poisoned").push(SubmittedClaim {
            gamusa_id: record.gamusa_id.clone(),
            location: record.location.clone(),
            token_uri: token_uri.as_str().to_string(),
        });
        Ok(PendingClaim::new(
            self.transaction_hash.lock().expect("poisoned").clone(),
        ))
    }

    async fn wait_for_receipt(
        &self,
        pending: &PendingClaim,
    ) -> Result<TransactionOutcome, Error> {
        let delay = *self.receipt_delay.lock().expect("poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.fail_receipt.lock().expect("poisoned").clone() {
            return Err(Error::Transaction(message));
        }
        Ok(TransactionOutcome {
            transaction_hash: pending.handle.clone(),
        })
    }
}
