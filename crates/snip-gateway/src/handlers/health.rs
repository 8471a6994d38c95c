use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::health::HealthStatus;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.health().check().await {
        HealthStatus::Healthy => (StatusCode::OK, "Service is healthy".to_string()),
        HealthStatus::Unhealthy { dependency, reason } => {
            warn!(%dependency, %reason, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{dependency} connection failed"),
            )
        }
    }
}
