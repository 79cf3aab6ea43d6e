//! Claim Saga - Type State Pattern Implementation
//!
//! One claim attempt, from raw QR payload to mined transaction, with the
//! stage ordering enforced at compile-time.
//!
//! # Type State Flow
//!
//! ```text
//! ClaimSaga<Initial>
//!   └─> validate() -> ClaimSaga<Validated>
//!         └─> check_claim() -> ClaimSaga<ReadyToMint>
//!               └─> pin_metadata() -> ClaimSaga<Pinned>
//!                     └─> submit() -> ClaimSaga<Confirmed>
//! ```
//!
//! A failed step consumes the saga; the caller starts a fresh attempt (or
//! re-enters `ReadyToMint` via [`ClaimSaga::resume`] for a user-initiated
//! retry that keeps the already-verified record). No step mutates durable
//! state, so there is nothing to compensate on failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;
use uuid::Uuid;

use self::state::{Confirmed, Initial, Pinned, ReadyToMint, Validated};
use crate::gateway::{ClaimRegistry, MetadataUploader, TransactionSubmitter};
use crate::metadata::MintMetadata;
use crate::types::{ScanRecord, TokenUri, TransactionOutcome};
use crate::workflow::events::{EventSink, StatusEvent};
use crate::workflow::RECEIPT_TIMEOUT;
use crate::{ensure_birina, Error};

pub mod state;

/// Shared context of every saga stage: the injected gateways, the event
/// sink, and the receipt-wait bound.
#[derive(Clone)]
pub struct SagaContext {
    /// Claim registry read capability
    pub registry: Arc<dyn ClaimRegistry>,
    /// Metadata upload capability
    pub uploader: Arc<dyn MetadataUploader>,
    /// Transition-output sink
    pub events: EventSink,
    /// Bound on the receipt wait
    pub receipt_timeout: Duration,
}

impl SagaContext {
    /// Context with the default receipt timeout.
    pub fn new(
        registry: Arc<dyn ClaimRegistry>,
        uploader: Arc<dyn MetadataUploader>,
        events: EventSink,
    ) -> Self {
        Self {
            registry,
            uploader,
            events,
            receipt_timeout: RECEIPT_TIMEOUT,
        }
    }
}

/// Saga for one claim attempt.
///
/// Each state (Initial, Validated, ReadyToMint, Pinned, Confirmed) is a
/// distinct type, and operations are only available on the appropriate type.
pub struct ClaimSaga<S> {
    /// Shared gateways and event sink
    ctx: SagaContext,
    /// State-specific data
    state_data: S,
}

impl ClaimSaga<Initial> {
    /// Create a new claim saga in the Initial state.
    pub fn new(ctx: SagaContext) -> Self {
        let operation_id = Uuid::new_v4();

        Self {
            ctx,
            state_data: Initial { operation_id },
        }
    }

    /// Decode and validate a raw QR payload.
    ///
    /// Malformed JSON and schema violations are distinct errors so the
    /// presentation layer can word them differently; both leave the caller
    /// free to rescan immediately.
    pub fn validate(self, raw_payload: &str) -> Result<ClaimSaga<Validated>, Error> {
        let record = ScanRecord::from_qr_payload(raw_payload).map_err(|err| {
            tracing::debug!(
                "Rejected QR payload for operation {}: {err}",
                self.state_data.operation_id
            );
            err
        })?;

        tracing::info!(
            "Accepted scan of Gamusa {} for operation {}",
            record.gamusa_id,
            self.state_data.operation_id
        );

        Ok(ClaimSaga {
            ctx: self.ctx,
            state_data: Validated {
                operation_id: self.state_data.operation_id,
                record,
            },
        })
    }
}

impl ClaimSaga<Validated> {
    /// Get the validated scan record
    pub fn record(&self) -> &ScanRecord {
        &self.state_data.record
    }

    /// Check the claim registry for the scanned identifier.
    ///
    /// One-shot read, never cached. An already-claimed identifier is an
    /// error: the invariant is that a mint is only attempted while the most
    /// recent observation was "unclaimed".
    #[instrument(skip_all)]
    pub async fn check_claim(self) -> Result<ClaimSaga<ReadyToMint>, Error> {
        let gamusa_id = self.state_data.record.gamusa_id.clone();

        tracing::info!(
            "Checking claim status of Gamusa {} for operation {}",
            gamusa_id,
            self.state_data.operation_id
        );
        self.ctx.events.emit(StatusEvent::VerifyingClaim {
            gamusa_id: gamusa_id.clone(),
        });

        let claimed = self.ctx.registry.is_claimed(&gamusa_id).await?;
        ensure_birina!(!claimed, Error::AlreadyClaimed);

        Ok(ClaimSaga {
            ctx: self.ctx,
            state_data: ReadyToMint {
                operation_id: self.state_data.operation_id,
                record: self.state_data.record,
            },
        })
    }
}

impl ClaimSaga<ReadyToMint> {
    /// Re-enter the ready-to-mint state with an already-verified record.
    ///
    /// Used for user-initiated retries after a failed mint attempt: the
    /// record was verified unclaimed when it was accepted, and the failure
    /// policy retries from ready-to-mint without rescanning.
    pub fn resume(ctx: SagaContext, record: ScanRecord) -> Self {
        Self {
            ctx,
            state_data: ReadyToMint {
                operation_id: Uuid::new_v4(),
                record,
            },
        }
    }

    /// Get the scan record awaiting its mint
    pub fn record(&self) -> &ScanRecord {
        &self.state_data.record
    }

    /// Consume the saga, yielding the verified record.
    pub fn into_record(self) -> ScanRecord {
        self.state_data.record
    }

    /// Derive metadata for the record and upload it.
    ///
    /// The derivation is deterministic; the upload is not idempotent
    /// (repeated calls may pin distinct content addresses), so the caller
    /// only retries on explicit user action.
    #[instrument(skip_all)]
    pub async fn pin_metadata(self) -> Result<ClaimSaga<Pinned>, Error> {
        tracing::info!(
            "Uploading metadata for Gamusa {} (operation {})",
            self.state_data.record.gamusa_id,
            self.state_data.operation_id
        );
        self.ctx.events.emit(StatusEvent::PreparingMetadata);

        let metadata = MintMetadata::from_record(&self.state_data.record);
        let token_uri = self.ctx.uploader.upload_metadata(&metadata).await?;

        tracing::debug!("Metadata pinned at {token_uri}");

        Ok(ClaimSaga {
            ctx: self.ctx,
            state_data: Pinned {
                operation_id: self.state_data.operation_id,
                record: self.state_data.record,
                token_uri,
            },
        })
    }
}

impl ClaimSaga<Pinned> {
    /// Get the token URI assigned to the pinned metadata
    pub fn token_uri(&self) -> &TokenUri {
        &self.state_data.token_uri
    }

    /// Submit the claim through the session's submitter and await its
    /// receipt.
    ///
    /// The receipt wait is the only step with its own timeout; exceeding it
    /// aborts the attempt. Nothing is retried here — a retry is a fresh
    /// user-initiated attempt from ready-to-mint.
    #[instrument(skip_all)]
    pub async fn submit(
        self,
        submitter: &dyn TransactionSubmitter,
    ) -> Result<ClaimSaga<Confirmed>, Error> {
        tracing::info!(
            "Submitting claim for Gamusa {} as {} (operation {})",
            self.state_data.record.gamusa_id,
            submitter.account(),
            self.state_data.operation_id
        );
        self.ctx.events.emit(StatusEvent::PreparingTransaction);

        let pending = submitter
            .submit_claim(&self.state_data.record, &self.state_data.token_uri)
            .await?;

        tracing::info!("Claim submitted, awaiting receipt of {}", pending.handle);
        self.ctx.events.emit(StatusEvent::TransactionPending {
            handle: pending.handle.clone(),
        });

        let outcome = match tokio::time::timeout(
            self.ctx.receipt_timeout,
            submitter.wait_for_receipt(&pending),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(
                    "No receipt for {} within {}s",
                    pending.handle,
                    self.ctx.receipt_timeout.as_secs()
                );
                return Err(Error::ReceiptTimeout {
                    secs: self.ctx.receipt_timeout.as_secs(),
                });
            }
        };

        tracing::info!(
            "Claim confirmed in transaction {} (operation {})",
            outcome.transaction_hash,
            self.state_data.operation_id
        );
        self.ctx.events.emit(StatusEvent::Minted {
            transaction_hash: outcome.transaction_hash.clone(),
        });

        Ok(ClaimSaga {
            ctx: self.ctx,
            state_data: Confirmed {
                operation_id: self.state_data.operation_id,
                outcome,
            },
        })
    }
}

impl ClaimSaga<Confirmed> {
    /// Get the operation ID
    pub fn operation_id(&self) -> Uuid {
        self.state_data.operation_id
    }

    /// Get the terminal outcome
    pub fn outcome(&self) -> &TransactionOutcome {
        &self.state_data.outcome
    }

    /// Get the hash of the mined claim transaction
    pub fn transaction_hash(&self) -> &str {
        &self.state_data.outcome.transaction_hash
    }
}
