//! Shared helpers for Birina integration tests.

use std::sync::Arc;

use birina::workflow::{ClaimSession, EventSink, StatusEvent};
use birina_fake_chain::{FakeClaimRegistry, FakePinning, FakeSubmitter};
use tokio::sync::mpsc::UnboundedReceiver;

/// A session over fake backends, with handles to script them.
pub struct TestHarness {
    /// Fake claim registry behind the session
    pub registry: Arc<FakeClaimRegistry>,
    /// Fake pinning store behind the session
    pub pinning: Arc<FakePinning>,
    /// Fake submitter, attach via `connect_wallet` where the test wants one
    pub submitter: Arc<FakeSubmitter>,
    /// Receive half of the session's event stream
    pub events: UnboundedReceiver<StatusEvent>,
    /// The session under test
    pub session: ClaimSession,
}

/// Initialize test tracing output; repeated calls are fine.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

/// Fresh session over fresh fakes, wallet not yet connected.
pub fn create_test_session() -> TestHarness {
    let registry = Arc::new(FakeClaimRegistry::new());
    let pinning = Arc::new(FakePinning::new());
    let submitter = Arc::new(FakeSubmitter::new());
    let (sink, events) = EventSink::channel();
    let session = ClaimSession::new(registry.clone(), pinning.clone(), sink);

    TestHarness {
        registry,
        pinning,
        submitter,
        events,
        session,
    }
}

/// Collect every event emitted so far.
pub fn drain_events(events: &mut UnboundedReceiver<StatusEvent>) -> Vec<StatusEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}
