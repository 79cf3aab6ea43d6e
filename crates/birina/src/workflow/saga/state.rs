//! State types for the claim saga.
//!
//! Each state is a distinct type that holds the data relevant to that stage
//! of the claim attempt. The type state pattern ensures that only valid
//! operations are available at each stage.

use uuid::Uuid;

use crate::types::{ScanRecord, TokenUri, TransactionOutcome};

/// Initial state - operation id assigned but no payload accepted yet.
///
/// The claim saga starts in this state. Only `validate()` is available.
pub struct Initial {
    /// Unique operation identifier for log correlation
    pub operation_id: Uuid,
}

/// Validated state - QR payload decoded and schema-checked.
///
/// Methods available: `check_claim()`
pub struct Validated {
    /// Unique operation identifier
    pub operation_id: Uuid,
    /// The accepted scan record
    pub record: ScanRecord,
}

/// Ready-to-mint state - the registry reported the identifier unclaimed.
///
/// Methods available: `pin_metadata()`
pub struct ReadyToMint {
    /// Unique operation identifier
    pub operation_id: Uuid,
    /// The accepted scan record
    pub record: ScanRecord,
}

/// Pinned state - metadata uploaded and a token URI assigned.
///
/// Methods available: `submit()`
pub struct Pinned {
    /// Unique operation identifier
    pub operation_id: Uuid,
    /// The accepted scan record
    pub record: ScanRecord,
    /// Content-addressed URI of the pinned metadata
    pub token_uri: TokenUri,
}

/// Confirmed state - the claim transaction was mined.
///
/// Terminal; the outcome can be retrieved and the saga is complete.
pub struct Confirmed {
    /// Unique operation identifier
    pub operation_id: Uuid,
    /// Hash of the mined claim transaction
    pub outcome: TransactionOutcome,
}
