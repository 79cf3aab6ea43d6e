//! Claim Workflow Integration Tests
//!
//! Drives the session state machine over fake backends: scan validation,
//! claim-status gating, the mint pipeline, failure recovery, and reset.

use std::time::Duration;

use anyhow::Result;
use birina::workflow::StatusEvent;
use birina::{Error, Phase};
use birina_fake_chain::{fake_scan_payload, SubmittedClaim};
use birina_integration_tests::{create_test_session, drain_events, setup_tracing};

// =============================================================================
// Scan stage
// =============================================================================

/// A payload missing a required field never reaches ready-to-mint and
/// issues no registry call
#[tokio::test]
async fn incomplete_payload_never_reaches_ready_to_mint() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();

    let raw = r#"{"gamusaId":"G-001","location":"Sualkuchi"}"#;
    let err = h.session.handle_scan(raw).await.unwrap_err();

    assert!(matches!(err, Error::InvalidPayload { .. }));
    assert_eq!(h.session.phase(), Phase::Error);
    assert_eq!(
        h.session.error(),
        Some("Invalid QR code format. Please scan a valid Gamusa QR code.")
    );
    assert!(h.session.scan_record().is_none());
    assert!(h.session.scanner_active());
    assert!(h.registry.checks().is_empty());

    Ok(())
}

/// A malformed payload resumes scanning with the generic read error
#[tokio::test]
async fn unreadable_payload_resumes_scanning() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();

    let err = h.session.handle_scan("not-json").await.unwrap_err();

    assert!(matches!(err, Error::UnreadablePayload));
    assert_eq!(
        h.session.error(),
        Some("Could not read QR code. Please try again.")
    );
    assert!(h.session.scanner_active());

    Ok(())
}

/// An already-claimed identifier blocks minting and keeps the scanner live
#[tokio::test]
async fn claimed_gamusa_stays_on_scanner() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.registry.mark_claimed("G-001");

    let err = h
        .session
        .handle_scan(&fake_scan_payload("G-001"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AlreadyClaimed));
    assert!(h.session.error().unwrap().contains("already been claimed"));
    assert_eq!(h.session.phase(), Phase::Error);
    assert!(h.session.scanner_active());
    // no upload was issued
    assert!(h.pinning.pinned().is_empty());

    Ok(())
}

/// An unclaimed identifier lands in ready-to-mint holding exactly the
/// scanned record
#[tokio::test]
async fn unclaimed_gamusa_reaches_ready_to_mint() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;

    assert_eq!(h.session.phase(), Phase::ReadyToMint);
    let record = h.session.scan_record().unwrap();
    assert_eq!(record.gamusa_id, "G-001");
    assert_eq!(record.location, "Sualkuchi");
    assert_eq!(record.image_hash, "Qm123");
    assert!(!h.session.scanner_active());
    assert_eq!(h.registry.checks(), vec!["G-001".to_string()]);

    Ok(())
}

/// A status-check transport failure surfaces its reason and a rescan works
#[tokio::test]
async fn status_check_failure_permits_rescan() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.registry.fail_with("node unreachable");

    let err = h
        .session
        .handle_scan(&fake_scan_payload("G-001"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StatusCheck(_)));
    assert!(h.session.error().unwrap().contains("node unreachable"));
    assert!(h.session.scanner_active());

    h.registry.clear_failure();
    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    assert_eq!(h.session.phase(), Phase::ReadyToMint);

    Ok(())
}

/// While a record is held the scanner is inactive and scans are rejected
/// without disturbing the session
#[tokio::test]
async fn scans_rejected_while_record_active() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    let err = h
        .session
        .handle_scan(&fake_scan_payload("G-002"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ScannerInactive));
    assert_eq!(h.session.phase(), Phase::ReadyToMint);
    assert_eq!(h.session.scan_record().unwrap().gamusa_id, "G-001");

    Ok(())
}

// =============================================================================
// Mint stage
// =============================================================================

/// The concrete end-to-end scenario: scan G-001, mint with tokenURI
/// ipfs://Qm456, confirm at 0xabc, then reset
#[tokio::test]
async fn scan_and_mint_happy_path() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());
    h.pinning.use_fixed_hash("Qm456");

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    let outcome = h.session.mint().await?;

    assert_eq!(outcome.transaction_hash, "0xabc");
    assert_eq!(h.session.phase(), Phase::Confirmed);
    assert_eq!(h.session.transaction_hash(), Some("0xabc"));
    // the claim completed, so the active record was discarded
    assert!(h.session.scan_record().is_none());
    assert!(!h.session.scanner_active());

    assert_eq!(
        h.submitter.submissions(),
        vec![SubmittedClaim {
            gamusa_id: "G-001".to_string(),
            location: "Sualkuchi".to_string(),
            token_uri: "ipfs://Qm456".to_string(),
        }]
    );

    let events = drain_events(&mut h.events);
    assert!(matches!(
        events.as_slice(),
        [
            StatusEvent::VerifyingClaim { .. },
            StatusEvent::PreparingMetadata,
            StatusEvent::PreparingTransaction,
            StatusEvent::TransactionPending { .. },
            StatusEvent::Minted { .. },
        ]
    ));

    h.session.reset();
    assert_eq!(h.session.phase(), Phase::Scanning);
    assert!(h.session.scan_record().is_none());
    assert!(h.session.transaction_hash().is_none());
    assert!(h.session.error().is_none());
    assert!(h.session.scanner_active());

    Ok(())
}

/// Minting without a wallet fails the gate, keeps the record, and works
/// after connecting
#[tokio::test]
async fn wallet_gate_blocks_then_permits_mint() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    assert!(!h.session.is_authenticated());

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::WalletRequired));
    assert_eq!(h.session.error(), Some("Please connect your wallet first"));
    assert_eq!(h.session.scan_record().unwrap().gamusa_id, "G-001");

    h.session.connect_wallet(h.submitter.clone());
    let outcome = h.session.mint().await?;
    assert!(!outcome.transaction_hash.is_empty());

    Ok(())
}

/// Minting without an active record is rejected
#[tokio::test]
async fn mint_without_record_is_rejected() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::MissingMintData));
    assert_eq!(h.session.error(), Some("Missing required data for minting"));

    Ok(())
}

/// An upload failure keeps the record so the user retries without
/// rescanning
#[tokio::test]
async fn upload_failure_retries_from_ready_to_mint() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    h.pinning.fail_with("pin quota exceeded");

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::MetadataUpload(_)));
    assert_eq!(h.session.phase(), Phase::Error);
    assert_eq!(h.session.scan_record().unwrap().gamusa_id, "G-001");
    assert!(h.submitter.submissions().is_empty());

    h.pinning.clear_failure();
    h.session.mint().await?;
    assert_eq!(h.session.phase(), Phase::Confirmed);

    Ok(())
}

/// A submission failure surfaces the stock transaction message and keeps
/// the record
#[tokio::test]
async fn submit_failure_surfaces_transaction_error() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    h.submitter.fail_submit_with("nonce too low");

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));
    assert_eq!(
        h.session.error(),
        Some("Transaction failed. Please try again.")
    );
    assert_eq!(h.session.scan_record().unwrap().gamusa_id, "G-001");

    Ok(())
}

/// A receipt that never arrives within the bound aborts the attempt
#[tokio::test]
async fn receipt_timeout_aborts_attempt() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session = h.session.with_receipt_timeout(Duration::from_millis(50));
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    h.submitter.delay_receipt(Duration::from_millis(500));

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::ReceiptTimeout { .. }));
    assert_eq!(h.session.phase(), Phase::Error);
    assert_eq!(h.session.scan_record().unwrap().gamusa_id, "G-001");

    Ok(())
}

/// A receipt-stage failure is a transaction error, not a timeout
#[tokio::test]
async fn receipt_failure_surfaces_transaction_error() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    h.submitter.fail_receipt_with("dropped from mempool");

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::Transaction(_)));

    Ok(())
}

/// A confirmed claim cannot be minted twice
#[tokio::test]
async fn confirmed_claim_cannot_remint() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    h.session.mint().await?;

    let err = h.session.mint().await.unwrap_err();
    assert!(matches!(err, Error::MissingMintData));
    assert_eq!(h.submitter.submissions().len(), 1);

    Ok(())
}

/// The uploaded metadata is the deterministic derivation of the record
#[tokio::test]
async fn uploaded_metadata_matches_derivation() -> Result<()> {
    setup_tracing();
    let mut h = create_test_session();
    h.session.connect_wallet(h.submitter.clone());

    h.session.handle_scan(&fake_scan_payload("G-001")).await?;
    let expected = serde_json::to_value(birina::MintMetadata::from_record(
        h.session.scan_record().unwrap(),
    ))?;
    h.session.mint().await?;

    assert_eq!(h.pinning.pinned(), vec![expected]);

    Ok(())
}
