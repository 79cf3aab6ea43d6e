//! Errors of the claim-and-mint workflow.
//!
//! Every variant's `Display` text is the user-visible message a presentation
//! layer shows for it; underlying reasons are kept in variant fields for
//! logging. No variant is fatal: each one leaves the session with a path back
//! to scanning or to a retry from ready-to-mint.

use thiserror::Error;

/// Birina error
#[derive(Debug, Error)]
pub enum Error {
    /// QR payload was not parseable JSON
    #[error("Could not read QR code. Please try again.")]
    UnreadablePayload,
    /// QR payload parsed but did not match the scan record schema
    #[error("Invalid QR code format. Please scan a valid Gamusa QR code.")]
    InvalidPayload {
        /// Which schema requirement was violated
        reason: String,
    },
    /// The scanned identifier is already associated with a minted token
    #[error("This Gamusa has already been claimed.")]
    AlreadyClaimed,
    /// Claim status check could not be completed
    #[error("Unable to verify Gamusa status: {0}")]
    StatusCheck(String),
    /// Metadata upload failed or returned an unusable response
    #[error("Failed to upload metadata: {0}")]
    MetadataUpload(String),
    /// Transaction submission or receipt retrieval failed
    #[error("Transaction failed. Please try again.")]
    Transaction(String),
    /// No receipt arrived within the configured bound
    #[error("Timed out waiting for transaction confirmation. Please try again.")]
    ReceiptTimeout {
        /// The bound that was exceeded, in seconds
        secs: u64,
    },
    /// Mint attempted without an established wallet session
    #[error("Please connect your wallet first")]
    WalletRequired,
    /// Mint attempted without an active scan record
    #[error("Missing required data for minting")]
    MissingMintData,
    /// Scan delivered while no scanner is active
    #[error("Scanner is not active")]
    ScannerInactive,
    /// Required credentials or endpoints are not configured
    #[error("{0}")]
    Config(String),
}

impl Error {
    /// Schema-violation error with the given reason.
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }
}
