//! Error types for the soil map service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::compound::Compound;

/// Result type alias using SoilMapError.
pub type SoilMapResult<T> = Result<T, SoilMapError>;

#[derive(Debug, Error)]
pub enum SoilMapError {
    #[error("Invalid coordinates: {0}")]
    Coordinates(String),

    #[error("Zoom {0} is outside the map's range")]
    InvalidZoom(f64),

    #[error("Request body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Unknown compound: {0}")]
    UnknownCompound(String),

    #[error("{} data is already loading", .0.name())]
    AlreadyLoading(Compound),

    /// The backend answered `{ok: false, message}`.
    #[error("Backend reported an error: {0}")]
    Backend(String),

    /// Transport failure or an undecodable upstream body.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl SoilMapError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SoilMapError::Coordinates(_)
            | SoilMapError::InvalidZoom(_)
            | SoilMapError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            SoilMapError::UnknownCompound(_) => StatusCode::NOT_FOUND,
            SoilMapError::AlreadyLoading(_) => StatusCode::CONFLICT,
            SoilMapError::Backend(_) | SoilMapError::Upstream(_) => StatusCode::BAD_GATEWAY,
            SoilMapError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<reqwest::Error> for SoilMapError {
    fn from(err: reqwest::Error) -> Self {
        SoilMapError::Upstream(err.to_string())
    }
}

impl IntoResponse for SoilMapError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SoilMapError::Coordinates("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SoilMapError::InvalidZoom(1100.0).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SoilMapError::AlreadyLoading(Compound::Clay).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SoilMapError::Backend("no data".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SoilMapError::NotConfigured("sand_url".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_backend_message_is_kept() {
        let err = SoilMapError::Backend("polygon too large".into());
        assert!(err.to_string().contains("polygon too large"));
    }

    #[test]
    fn test_already_loading_names_compound() {
        let err = SoilMapError::AlreadyLoading(Compound::SocStock);
        assert_eq!(err.to_string(), "SOC stock data is already loading");
    }
}
