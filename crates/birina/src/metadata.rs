//! NFT metadata derivation.
//!
//! A [`MintMetadata`] is derived deterministically from a [`ScanRecord`];
//! identical records serialize to byte-identical JSON. The value is
//! transient, existing only for the duration of one upload call.

use serde::{Deserialize, Serialize};

use crate::types::ScanRecord;

/// Descriptive metadata pinned for a minted Gamusa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintMetadata {
    /// Token display name
    pub name: String,
    /// Token description
    pub description: String,
    /// Content address of the item's photograph
    pub image: String,
    /// Provenance attributes carried over from the scan
    pub attributes: MintAttributes,
}

/// Provenance attributes of a minted Gamusa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintAttributes {
    /// Unique identifier of the physical item
    pub gamusa_id: String,
    /// Where the item was woven
    pub location: String,
    /// Name of the weaver, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artisan_name: Option<String>,
    /// Date the item was woven, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
}

impl MintMetadata {
    /// Derive metadata for a scanned record.
    pub fn from_record(record: &ScanRecord) -> Self {
        Self {
            name: format!("Gamusa #{}", record.gamusa_id),
            description: format!("Authentic Assamese Gamusa from {}", record.location),
            image: format!("ipfs://{}", record.image_hash),
            attributes: MintAttributes {
                gamusa_id: record.gamusa_id.clone(),
                location: record.location.clone(),
                artisan_name: record.artisan_name.clone(),
                creation_date: record.creation_date.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ScanRecord {
        ScanRecord {
            gamusa_id: "G-001".to_string(),
            location: "Sualkuchi".to_string(),
            image_hash: "Qm123".to_string(),
            artisan_name: None,
            creation_date: None,
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = serde_json::to_vec(&MintMetadata::from_record(&record())).unwrap();
        let b = serde_json::to_vec(&MintMetadata::from_record(&record())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_fields() {
        let metadata = MintMetadata::from_record(&record());
        assert_eq!(metadata.name, "Gamusa #G-001");
        assert_eq!(
            metadata.description,
            "Authentic Assamese Gamusa from Sualkuchi"
        );
        assert_eq!(metadata.image, "ipfs://Qm123");
        assert_eq!(metadata.attributes.gamusa_id, "G-001");
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let json = serde_json::to_string(&MintMetadata::from_record(&record())).unwrap();
        assert!(!json.contains("artisanName"));
        assert!(!json.contains("creationDate"));
    }

    #[test]
    fn present_optionals_are_serialized() {
        let mut r = record();
        r.artisan_name = Some("Rupali".to_string());
        let json = serde_json::to_string(&MintMetadata::from_record(&r)).unwrap();
        assert!(json.contains(r#""artisanName":"Rupali""#));
    }
}
