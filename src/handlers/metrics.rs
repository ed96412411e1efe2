//! Metrics snapshot endpoint.
//! Used by: server.

use axum::extract::State;
use axum::Json;

use crate::state::AppState;
use crate::telemetry::MetricsSnapshot;

/// Reports the issue/verify/reject counters accumulated since startup.
pub async fn snapshot(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
