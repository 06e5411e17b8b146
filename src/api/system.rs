use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, HealthResponse, MessageResponse};
use crate::constants::messages;

/// POST /test/reset
/// Wipes all data and reseeds the catalog. Only available in test mode.
pub async fn reset_database(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.shared.config().general.test_mode {
        return Err(ApiError::Forbidden(messages::RESET_NOT_ALLOWED.to_string()));
    }

    state.shared.store.reset().await?;
    tracing::warn!("Database reset via test endpoint");

    Ok(Json(MessageResponse {
        message: messages::RESET_DONE.to_string(),
    }))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.shared.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {e}");
            false
        }
    };

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
