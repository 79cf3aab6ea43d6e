//! Capability traits for the external collaborators of the workflow.
//!
//! The workflow never talks to a chain, a pinning service, or a wallet
//! directly; it is parameterized by these seams. Production backends live in
//! `birina-chain` and `birina-pinata`, the HTTP-proxy client in
//! [`crate::client`], and scriptable fakes in `birina-fake-chain`.

use async_trait::async_trait;
use serde_json::Value;

use crate::metadata::MintMetadata;
use crate::types::{PendingClaim, ScanRecord, TokenUri, TransactionOutcome};
use crate::Error;

/// Read access to the claim registry contract.
///
/// One-shot reads, never cached: the workflow recomputes the claim status on
/// every scan.
#[async_trait]
pub trait ClaimRegistry: Send + Sync {
    /// Whether `gamusa_id` has already been claimed.
    async fn is_claimed(&self, gamusa_id: &str) -> Result<bool, Error>;
}

/// A pinning backend accepting arbitrary JSON and returning a content hash.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Pin a JSON document, returning its content hash.
    async fn pin_json(&self, metadata: &Value) -> Result<String, Error>;
}

/// The workflow-facing metadata upload capability.
///
/// Distinct from [`MetadataStore`]: the store is what the upload endpoint
/// wraps, the uploader is what the workflow calls (in production, the
/// endpoint itself via [`crate::client::HttpClient`]).
#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Upload derived metadata, returning its token URI.
    async fn upload_metadata(&self, metadata: &MintMetadata) -> Result<TokenUri, Error>;
}

/// Capability to submit a claim transaction and await its receipt.
///
/// Exactly one submitter is selected per session; the direct and sponsored
/// paths are two implementations of this trait, never two code paths in the
/// workflow.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Address of the account the claim is minted to.
    fn account(&self) -> &str;

    /// Submit `claimGamusa(gamusaId, location, tokenURI)` with zero native
    /// value, returning a handle to the in-flight claim.
    async fn submit_claim(
        &self,
        record: &ScanRecord,
        token_uri: &TokenUri,
    ) -> Result<PendingClaim, Error>;

    /// Block until the claim's receipt is available.
    ///
    /// Callers bound this with a timeout; implementations may poll
    /// indefinitely.
    async fn wait_for_receipt(&self, pending: &PendingClaim)
        -> Result<TransactionOutcome, Error>;
}
