//! # Birina
//!
//! Core library for the Birina claim-and-mint application: scan a QR code
//! describing a physical Gamusa, check on-chain whether that identifier has
//! already been claimed, pin descriptive metadata, and submit a claim
//! transaction through one of two submitter backends (direct or sponsored).
//!
//! The crate is transport-agnostic: every remote collaborator sits behind a
//! trait in [`gateway`], and the workflow in [`workflow`] is pure
//! orchestration over those traits.

pub mod client;
pub mod error;
pub mod gateway;
pub mod metadata;
pub mod types;
pub mod workflow;

pub use client::HttpClient;
pub use error::Error;
pub use metadata::MintMetadata;
pub use types::{ClaimCheck, PendingClaim, ScanRecord, TokenUri, TransactionOutcome};
pub use workflow::{ClaimSession, Phase};

/// Bail out of the current function with `$err` unless `$cond` holds.
#[macro_export]
macro_rules! ensure_birina {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}
