//! Provider status API handler.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use aggregator_core::ProviderStatusReport;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProviderStatusResponse {
    pub providers: Vec<ProviderStatusReport>,
    pub online: usize,
}

/// GET /api/v1/providers/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProviderStatusResponse>, impl IntoResponse> {
    match state.aggregator().statuses().await {
        Ok(providers) => {
            let online = providers.iter().filter(|p| p.online).count();
            Ok(Json(ProviderStatusResponse { providers, online }))
        }
        Err(e) => {
            warn!(error = %e, "Provider status check failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
