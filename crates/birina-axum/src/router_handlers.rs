use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use birina::types::ClaimCheck;
use birina::Error;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::BirinaState;

/// Query parameters of the claim status check
#[derive(Debug, Deserialize)]
pub struct CheckStatusParams {
    /// Gamusa identifier to check
    pub id: Option<String>,
}

/// Response of a successful metadata upload
#[derive(Debug, Serialize)]
pub struct UploadMetadataResponse {
    /// Always true on the success path
    pub success: bool,
    /// Content-addressed URI of the pinned metadata
    #[serde(rename = "tokenURI")]
    pub token_uri: String,
}

/// Request body of the metadata upload
#[derive(Debug, Deserialize)]
pub struct UploadMetadataRequest {
    /// Arbitrary JSON metadata to pin
    pub metadata: Option<serde_json::Value>,
}

/// Check whether a Gamusa identifier has already been claimed
///
/// One-shot passthrough to the registry read; the status is never cached.
#[instrument(skip_all, fields(id = ?params.id))]
pub async fn get_check_status(
    State(state): State<BirinaState>,
    Query(params): Query<CheckStatusParams>,
) -> Result<Json<ClaimCheck>, Response> {
    let Some(id) = params.id.as_deref().filter(|id| !id.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid Gamusa ID" })),
        )
            .into_response());
    };

    let is_claimed = state.registry.is_claimed(id).await.map_err(|err| {
        tracing::error!("Could not check claim status of {id}: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "message": "Error calling contract function",
                "error": err.to_string(),
                "details": { "gamusaId": id },
            })),
        )
            .into_response()
    })?;

    Ok(Json(ClaimCheck::for_status(is_claimed)))
}

/// Pin a metadata document, returning its token URI
///
/// One-shot passthrough to the pinning backend; no retry and no
/// idempotency key.
#[instrument(skip_all)]
pub async fn post_upload_metadata(
    State(state): State<BirinaState>,
    Json(payload): Json<UploadMetadataRequest>,
) -> Result<Json<UploadMetadataResponse>, Response> {
    let Some(metadata) = payload.metadata else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No metadata provided" })),
        )
            .into_response());
    };

    let hash = state
        .store
        .pin_json(&metadata)
        .await
        .map_err(into_response)?;

    Ok(Json(UploadMetadataResponse {
        success: true,
        token_uri: format!("ipfs://{hash}"),
    }))
}

fn into_response(err: Error) -> Response {
    tracing::error!("Could not pin metadata: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
