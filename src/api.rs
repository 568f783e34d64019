//! Wire types shared with the soil backend.

use serde::{Deserialize, Serialize};

use crate::geo::LngLat;
use crate::heatmap::SoilPoint;

/// Request body sent to every compound endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordsPayload {
    pub coords: Vec<LngLat>,
}

/// Backend reply, discriminated by its `ok` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawApiResponse", into = "RawApiResponse")]
pub enum ApiResponse {
    Success(Vec<SoilPoint>),
    Failure(String),
}

#[derive(Serialize, Deserialize)]
struct RawApiResponse {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Vec<SoilPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl TryFrom<RawApiResponse> for ApiResponse {
    type Error = String;

    fn try_from(raw: RawApiResponse) -> Result<Self, Self::Error> {
        match (raw.ok, raw.result, raw.message) {
            (true, Some(result), _) => Ok(ApiResponse::Success(result)),
            (true, None, _) => Err("`ok: true` response without `result`".to_string()),
            (false, _, message) => Ok(ApiResponse::Failure(
                message.unwrap_or_else(|| "backend returned no message".to_string()),
            )),
        }
    }
}

impl From<ApiResponse> for RawApiResponse {
    fn from(response: ApiResponse) -> Self {
        match response {
            ApiResponse::Success(result) => RawApiResponse {
                ok: true,
                result: Some(result),
                message: None,
            },
            ApiResponse::Failure(message) => RawApiResponse {
                ok: false,
                result: None,
                message: Some(message),
            },
        }
    }
}
