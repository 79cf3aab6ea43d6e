//! The claim-and-mint workflow.
//!
//! Two cooperating layers:
//!
//! - [`saga`] — the typestate pipeline for one claim attempt. Each stage is
//!   a distinct type, so the compiler enforces the scan → check → pin →
//!   submit ordering.
//! - [`session`] — the observable per-session state machine: current phase,
//!   active scan record, error text, wallet gate, and reset. One instance
//!   per user session; nothing is persisted, so dropping the session (the
//!   page-reload analog) forgets everything.
//!
//! Side effects are [`events::StatusEvent`]s on the session's channel,
//! consumed by whatever presentation layer is attached.

use std::time::Duration;

pub mod events;
pub mod saga;
mod session;

pub use events::{EventSink, StatusEvent};
pub use saga::ClaimSaga;
pub use session::{ClaimSession, Phase};

/// Default bound on the receipt wait, the only step with its own timeout.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(60);
