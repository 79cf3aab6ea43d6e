//! Data model of the claim-and-mint flow.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ensure_birina, Error};

/// A validated QR payload describing one physical Gamusa.
///
/// Immutable once accepted. At most one record is active per session; a new
/// successful scan or an explicit reset replaces it, and a completed claim
/// discards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Unique identifier of the physical item
    pub gamusa_id: String,
    /// Where the item was woven
    pub location: String,
    /// Content address of the item's photograph
    pub image_hash: String,
    /// Name of the weaver, when the code carries it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artisan_name: Option<String>,
    /// Date the item was woven, when the code carries it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl ScanRecord {
    /// Decode and validate a raw QR payload.
    ///
    /// Malformed JSON is reported distinctly from a well-formed object that
    /// violates the schema, so the two failure modes can carry different
    /// user-facing messages.
    pub fn from_qr_payload(raw: &str) -> Result<Self, Error> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|_| Error::UnreadablePayload)?;

        let record: ScanRecord = serde_json::from_value(value)
            .map_err(|e| Error::invalid_payload(e.to_string()))?;

        record.validate()?;
        Ok(record)
    }

    /// Check that every required field is present and non-empty.
    pub fn validate(&self) -> Result<(), Error> {
        ensure_birina!(
            !self.gamusa_id.trim().is_empty(),
            Error::invalid_payload("Gamusa ID is required")
        );
        ensure_birina!(
            !self.location.trim().is_empty(),
            Error::invalid_payload("Location is required")
        );
        ensure_birina!(
            !self.image_hash.trim().is_empty(),
            Error::invalid_payload("Image hash is required")
        );
        Ok(())
    }
}

/// Result of a claim status check, as served by `GET /check-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCheck {
    /// Whether the identifier is already claimed
    pub is_claimed: bool,
    /// Human-readable status line
    pub message: String,
}

impl ClaimCheck {
    /// Build the wire response for a registry read result.
    pub fn for_status(is_claimed: bool) -> Self {
        let message = if is_claimed {
            "This Gamusa has already been claimed"
        } else {
            "Gamusa is available for claiming"
        };
        Self {
            is_claimed,
            message: message.to_string(),
        }
    }
}

/// Content-addressed URI of pinned metadata, `ipfs://<hash>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenUri(String);

impl TokenUri {
    /// Derive the URI for a pinned content hash.
    pub fn from_ipfs_hash(hash: &str) -> Self {
        Self(format!("ipfs://{hash}"))
    }

    /// The URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TokenUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl fmt::Display for TokenUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to a submitted but not yet confirmed claim.
///
/// Holds a transaction hash on the direct path and a user-operation hash on
/// the sponsored path; only the submitter that issued it can interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClaim {
    /// Submitter-specific identifier of the in-flight claim
    pub handle: String,
}

impl PendingClaim {
    /// Wrap a submitter-issued handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

/// Terminal value of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    /// Hash of the mined claim transaction
    pub transaction_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str =
        r#"{"gamusaId":"G-001","location":"Sualkuchi","imageHash":"Qm123"}"#;

    #[test]
    fn accepts_well_formed_payload() {
        let record = ScanRecord::from_qr_payload(WELL_FORMED).unwrap();
        assert_eq!(record.gamusa_id, "G-001");
        assert_eq!(record.location, "Sualkuchi");
        assert_eq!(record.image_hash, "Qm123");
        assert!(record.artisan_name.is_none());
    }

    #[test]
    fn accepts_optional_fields() {
        let raw = r#"{"gamusaId":"G-002","location":"Sualkuchi","imageHash":"Qm9",
                      "artisanName":"Rupali","creationDate":"2024-11-02"}"#;
        let record = ScanRecord::from_qr_payload(raw).unwrap();
        assert_eq!(record.artisan_name.as_deref(), Some("Rupali"));
        assert_eq!(record.creation_date.as_deref(), Some("2024-11-02"));
    }

    #[test]
    fn malformed_json_is_unreadable() {
        let err = ScanRecord::from_qr_payload("not json at all").unwrap_err();
        assert!(matches!(err, Error::UnreadablePayload));
    }

    #[test]
    fn missing_required_field_is_invalid() {
        let raw = r#"{"gamusaId":"G-001","location":"Sualkuchi"}"#;
        let err = ScanRecord::from_qr_payload(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidPayload { .. }));
    }

    #[test]
    fn empty_required_field_is_invalid() {
        let raw = r#"{"gamusaId":"","location":"Sualkuchi","imageHash":"Qm123"}"#;
        let err = ScanRecord::from_qr_payload(raw).unwrap_err();
        match err {
            Error::InvalidPayload { reason } => assert_eq!(reason, "Gamusa ID is required"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_is_invalid() {
        // valid JSON, wrong shape
        let err = ScanRecord::from_qr_payload("42").unwrap_err();
        assert!(matches!(err, Error::InvalidPayload { .. }));
    }

    #[test]
    fn claim_check_messages() {
        assert_eq!(
            ClaimCheck::for_status(true).message,
            "This Gamusa has already been claimed"
        );
        assert_eq!(
            ClaimCheck::for_status(false).message,
            "Gamusa is available for claiming"
        );
    }

    #[test]
    fn token_uri_from_hash() {
        assert_eq!(TokenUri::from_ipfs_hash("Qm456").as_str(), "ipfs://Qm456");
    }
}
