//! Transition outputs of the workflow.
//!
//! Each event corresponds to a user-visible status change; the workflow
//! never renders anything itself. A presentation layer consumes the channel
//! and maps events to toasts or status text (the `Display` impl carries the
//! stock wording).

use std::fmt;

use tokio::sync::mpsc;

/// A user-visible status change emitted by the workflow.
#[derive(Debug, Clone)]
pub enum StatusEvent {
    /// The scanned identifier is being checked against the registry
    VerifyingClaim {
        /// Identifier under check
        gamusa_id: String,
    },
    /// Metadata is being derived and uploaded
    PreparingMetadata,
    /// The claim transaction is being built and submitted
    PreparingTransaction,
    /// The claim was submitted and its receipt is awaited
    TransactionPending {
        /// Submitter-specific handle of the in-flight claim
        handle: String,
    },
    /// The claim transaction was mined
    Minted {
        /// Hash of the mined transaction
        transaction_hash: String,
    },
    /// The current attempt failed
    Failed {
        /// User-visible failure message
        message: String,
    },
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerifyingClaim { .. } => f.write_str("Verifying Gamusa..."),
            Self::PreparingMetadata => f.write_str("Preparing Metadata..."),
            Self::PreparingTransaction => f.write_str("Preparing transaction..."),
            Self::TransactionPending { .. } => f.write_str("Transaction pending..."),
            Self::Minted { .. } => f.write_str("Successfully minted your Gamusa NFT!"),
            Self::Failed { message } => f.write_str(message),
        }
    }
}

/// Send half of a workflow's event stream.
///
/// Emission never fails and never blocks; events are dropped when no
/// receiver is attached or the receiver has shut down.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<StatusEvent>>,
}

impl EventSink {
    /// A sink/receiver pair for a session with an attached presentation
    /// layer.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops every event, for headless use.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emit one event.
    pub fn emit(&self, event: StatusEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
