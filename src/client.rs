//! HTTP client for the soil backend.

use bytes::Bytes;
use reqwest::{header, Client};
use serde::de::IgnoredAny;
use tracing::{debug, info, instrument};

use crate::api::{ApiResponse, CoordsPayload};
use crate::compound::Compound;
use crate::error::{SoilMapError, SoilMapResult};
use crate::geo::LngLat;

/// Upstream status and JSON body, passed through untouched.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: u16,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct SoilClient {
    http: Client,
    root_url: Option<String>,
    sand_url: Option<String>,
}

impl SoilClient {
    pub fn new(root_url: Option<String>, sand_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            root_url: root_url.map(|u| u.trim_end_matches('/').to_string()),
            sand_url,
        }
    }

    /// Endpoint serving the given compound.
    ///
    /// Sand goes straight to the sand upstream; SOC stock and clay are
    /// served under the root URL.
    pub fn endpoint(&self, compound: Compound) -> SoilMapResult<String> {
        match compound {
            Compound::Sand => self
                .sand_url
                .clone()
                .ok_or_else(|| SoilMapError::NotConfigured("sand_url".into())),
            Compound::SocStock | Compound::Clay => self
                .root_url
                .as_ref()
                .map(|root| format!("{}/api/{}", root, compound.slug()))
                .ok_or_else(|| SoilMapError::NotConfigured("root_url".into())),
        }
    }

    #[instrument(skip(self, coords), fields(points = coords.len()))]
    pub async fn fetch_compound(
        &self,
        compound: Compound,
        coords: &[LngLat],
    ) -> SoilMapResult<ApiResponse> {
        let url = self.endpoint(compound)?;
        let payload = CoordsPayload {
            coords: coords.to_vec(),
        };

        debug!("POST {}", url);
        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        serde_json::from_slice::<ApiResponse>(&body).map_err(|e| {
            SoilMapError::Upstream(format!(
                "{} replied {} with an unexpected body: {}",
                url, status, e
            ))
        })
    }

    /// Forwards `body` to the sand upstream byte for byte and returns its
    /// reply the same way. The reply must still be JSON.
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn forward_sand(&self, body: Bytes) -> SoilMapResult<Forwarded> {
        let url = self
            .sand_url
            .as_deref()
            .ok_or_else(|| SoilMapError::NotConfigured("sand_url".into()))?;

        let response = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(|e| {
            SoilMapError::Upstream(format!("sand upstream replied {} with non-JSON body: {}", status, e))
        })?;

        info!("Proxied sand request, upstream status {}", status);
        Ok(Forwarded { status, body })
    }
}
