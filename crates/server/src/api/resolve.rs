//! Resolve API handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use aggregator_core::{AggregatorError, Resolution, ResolveParams, ResolveRequest};

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// HTTP status for a dispatcher error.
fn error_status(error: &AggregatorError) -> StatusCode {
    match error {
        AggregatorError::InvalidMethod(_) | AggregatorError::MissingDetails(_) => {
            StatusCode::BAD_REQUEST
        }
        AggregatorError::ProviderFailure { .. } | AggregatorError::TranslationFailure(_) => {
            StatusCode::BAD_GATEWAY
        }
        AggregatorError::Registry(_) | AggregatorError::NoProviders => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn error_response(error: AggregatorError) -> (StatusCode, Json<ErrorResponse>) {
    (
        error_status(&error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// POST /api/v1/resolve
///
/// Resolve a title into one torrent per quality tier, or into the raw
/// output of the fastest provider when `method` is `race`.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResolveParams>,
) -> Result<Json<Resolution>, (StatusCode, Json<ErrorResponse>)> {
    let request = ResolveRequest::try_from(body).map_err(error_response)?;
    debug!(
        id = %request.id,
        kind = %request.kind,
        method = %request.method,
        use_cache = request.use_cache,
        "Resolve requested"
    );

    state
        .aggregator()
        .resolve(&request)
        .await
        .map(Json)
        .map_err(error_response)
}
