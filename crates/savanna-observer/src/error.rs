//! Error types for the observer API layer.
//!
//! [`ObserverError`] converts into an Axum HTTP response carrying the
//! same `{"ok": false, "error": ...}` body shape the dashboard expects
//! from every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while serving observer requests.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The orchestrator's command channel is closed.
    #[error("simulation is not accepting commands")]
    CommandChannelClosed,
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::CommandChannelClosed => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
