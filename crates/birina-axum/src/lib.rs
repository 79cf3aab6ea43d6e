//! Axum router for the Birina proxy endpoints.
//!
//! Two one-shot passthroughs, no caching and no rate limiting: the claim
//! status check in front of the registry read, and the metadata upload in
//! front of the pinning store.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use birina::gateway::{ClaimRegistry, MetadataStore};

use crate::router_handlers::{get_check_status, post_upload_metadata};

pub mod router_handlers;

/// Shared state of the Birina router.
#[derive(Clone)]
pub struct BirinaState {
    /// Claim registry read capability
    pub registry: Arc<dyn ClaimRegistry>,
    /// Pinning backend
    pub store: Arc<dyn MetadataStore>,
}

/// Build the Birina router over the given backends.
pub fn create_birina_router(registry: Arc<dyn ClaimRegistry>, store: Arc<dyn MetadataStore>) -> Router {
    let state = BirinaState { registry, store };

    Router::new()
        .route("/check-status", get(get_check_status))
        .route("/upload-metadata", post(post_upload_metadata))
        .with_state(state)
}
