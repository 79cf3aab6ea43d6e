//! The per-session claim state machine.
//!
//! One [`ClaimSession`] exists per user session and is the only writer to
//! its state. Every remote step is an await point on a `&mut self` method,
//! so re-entrant submission is impossible by construction and the UI can
//! simply disable actions while a call is outstanding.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::gateway::{ClaimRegistry, MetadataUploader, TransactionSubmitter};
use crate::types::{ScanRecord, TransactionOutcome};
use crate::workflow::events::{EventSink, StatusEvent};
use crate::workflow::saga::{ClaimSaga, SagaContext};
use crate::{ensure_birina, Error};

/// Observable phase of a claim session.
///
/// `Checking`, `Uploading`, and `Submitting` are transient: they are set for
/// the duration of the corresponding await and a driver call never returns
/// while one is current. Resting phases are `Scanning`, `ReadyToMint`,
/// `Confirmed`, and `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scanner active, waiting for a QR payload
    Scanning,
    /// Claim status check in flight
    Checking,
    /// A verified record is held and a mint can be initiated
    ReadyToMint,
    /// Metadata upload in flight
    Uploading,
    /// Transaction submission or receipt wait in flight
    Submitting,
    /// A claim completed; the transaction hash is held
    Confirmed,
    /// The last attempt failed; a recovery path is always available
    Error,
}

/// The claim-and-mint state machine for one user session.
///
/// Holds at most one active [`ScanRecord`]; a new successful scan or a reset
/// replaces it and a completed claim discards it. Nothing is persisted:
/// dropping the session forgets all of it, and any call in flight at that
/// moment is simply abandoned.
pub struct ClaimSession {
    ctx: SagaContext,
    wallet: Option<Arc<dyn TransactionSubmitter>>,
    phase: Phase,
    record: Option<ScanRecord>,
    transaction_hash: Option<String>,
    error: Option<String>,
}

impl ClaimSession {
    /// Create a session in the scanning phase with no wallet attached.
    pub fn new(
        registry: Arc<dyn ClaimRegistry>,
        uploader: Arc<dyn MetadataUploader>,
        events: EventSink,
    ) -> Self {
        Self {
            ctx: SagaContext::new(registry, uploader, events),
            wallet: None,
            phase: Phase::Scanning,
            record: None,
            transaction_hash: None,
            error: None,
        }
    }

    /// Override the receipt-wait bound.
    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.ctx.receipt_timeout = timeout;
        self
    }

    /// Attach the submitter selected for this session.
    ///
    /// Exactly one submitter (direct or sponsored) serves a session; which
    /// one is a configuration decision made where the session is built.
    pub fn connect_wallet(&mut self, submitter: Arc<dyn TransactionSubmitter>) {
        tracing::info!("Wallet connected: {}", submitter.account());
        self.wallet = Some(submitter);
    }

    /// Detach the wallet; subsequent mints fail the authentication gate.
    pub fn disconnect_wallet(&mut self) {
        self.wallet = None;
    }

    /// Whether a wallet session is established.
    ///
    /// The gate a presentation layer evaluates before entering the workflow
    /// (redirecting unauthenticated sessions instead of rendering it).
    pub fn is_authenticated(&self) -> bool {
        self.wallet.is_some()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last user-visible error message, if the session is in `Error`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The active scan record, if one is held.
    pub fn scan_record(&self) -> Option<&ScanRecord> {
        self.record.as_ref()
    }

    /// Hash of the confirmed claim, once one completed.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.transaction_hash.as_deref()
    }

    /// Whether the scanner is live.
    ///
    /// Scanning stays available after every scan-stage failure (no terminal
    /// lockup) and is hidden while a record is held or a claim confirmed.
    pub fn scanner_active(&self) -> bool {
        match self.phase {
            Phase::Scanning => true,
            Phase::Error => self.record.is_none() && self.transaction_hash.is_none(),
            _ => false,
        }
    }

    /// Feed one decoded QR payload into the session.
    ///
    /// Validates the payload and checks its claim status. On success the
    /// session holds the record in `ReadyToMint` and the scanner is hidden;
    /// on any failure the session lands in `Error` with the scanner still
    /// active.
    #[instrument(skip_all)]
    pub async fn handle_scan(&mut self, raw_payload: &str) -> Result<(), Error> {
        ensure_birina!(self.scanner_active(), Error::ScannerInactive);
        self.error = None;

        let validated = match ClaimSaga::new(self.ctx.clone()).validate(raw_payload) {
            Ok(saga) => saga,
            Err(err) => return Err(self.surface(err)),
        };

        self.phase = Phase::Checking;
        match validated.check_claim().await {
            Ok(ready) => {
                self.record = Some(ready.into_record());
                self.phase = Phase::ReadyToMint;
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Mint the active record.
    ///
    /// Guarded on an active record and an attached wallet. Failures of the
    /// upload, the submission, or the receipt wait keep the record so the
    /// user retries from ready-to-mint without rescanning.
    #[instrument(skip_all)]
    pub async fn mint(&mut self) -> Result<TransactionOutcome, Error> {
        self.error = None;

        let record = match (&self.record, &self.transaction_hash) {
            (Some(record), None) => record.clone(),
            _ => return Err(self.surface(Error::MissingMintData)),
        };
        let submitter = match &self.wallet {
            Some(submitter) => Arc::clone(submitter),
            None => return Err(self.surface(Error::WalletRequired)),
        };

        self.phase = Phase::Uploading;
        let pinned = match ClaimSaga::resume(self.ctx.clone(), record)
            .pin_metadata()
            .await
        {
            Ok(pinned) => pinned,
            Err(err) => return Err(self.surface(err)),
        };

        self.phase = Phase::Submitting;
        let confirmed = match pinned.submit(submitter.as_ref()).await {
            Ok(confirmed) => confirmed,
            Err(err) => return Err(self.surface(err)),
        };

        let outcome = confirmed.outcome().clone();
        self.transaction_hash = Some(outcome.transaction_hash.clone());
        // claim complete: the active record is discarded
        self.record = None;
        self.phase = Phase::Confirmed;
        Ok(outcome)
    }

    /// Return to scanning, clearing the record, hash, and error.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting claim session");
        self.record = None;
        self.transaction_hash = None;
        self.error = None;
        self.phase = Phase::Scanning;
    }

    /// Route a failure into the `Error` phase with its user-visible text.
    fn surface(&mut self, err: Error) -> Error {
        tracing::warn!(?err, "Claim attempt failed");
        let message = err.to_string();
        self.ctx.events.emit(StatusEvent::Failed {
            message: message.clone(),
        });
        self.error = Some(message);
        self.phase = Phase::Error;
        err
    }
}
