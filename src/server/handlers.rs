use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{sse::Event as SseEvent, Html, IntoResponse, Json, Response, Sse},
};
use bytes::Bytes;
use rust_embed::RustEmbed;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, info, warn};

use super::events::ViewEvent;
use super::state::AppState;
use crate::api::ApiResponse;
use crate::compound::Compound;
use crate::constants::SSE_KEEPALIVE_SECS;
use crate::error::{SoilMapError, SoilMapResult};
use crate::geo::parse_coordinates;
use crate::html_template::render_index;
use crate::view::MapView;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

#[derive(Debug, Deserialize)]
pub struct CompoundRequest {
    /// Raw text from the coordinates box
    #[serde(default)]
    pub coords_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ZoomRequest {
    pub zoom: f64,
}

#[derive(Debug, Serialize)]
pub struct ZoomResponse {
    pub radius: f64,
}

/// Map view after a compound request.
#[derive(Debug, Serialize)]
pub struct CompoundResponse {
    /// The result was older than the data already shown and was dropped
    pub stale: bool,
    #[serde(flatten)]
    pub view: MapView,
}

pub async fn index_html(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let asset = Asset::get("index.html").ok_or(StatusCode::NOT_FOUND)?;
    let template = String::from_utf8_lossy(&asset.data);
    Ok(render_index(&template, &state.settings))
}

fn static_asset(name: &str, content_type: &'static str) -> Response {
    match Asset::get(name) {
        Some(content) => (
            [(header::CONTENT_TYPE, content_type)],
            content.data.into_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn style_css() -> Response {
    static_asset("style.css", "text/css")
}

pub async fn script_js() -> Response {
    static_asset("script.js", "application/javascript")
}

// API endpoint returning the current map view
pub async fn get_view(State(state): State<AppState>) -> Json<MapView> {
    Json(state.view().snapshot())
}

// API endpoint called by the page whenever the map zoom changes
pub async fn set_zoom(
    State(state): State<AppState>,
    Json(request): Json<ZoomRequest>,
) -> SoilMapResult<Json<ZoomResponse>> {
    let radius = state.view().set_zoom(request.zoom)?;
    debug!("Zoom {} -> heat map radius {}", request.zoom, radius);
    Ok(Json(ZoomResponse { radius }))
}

/// Runs one compound cycle: parse, draw, fetch, rescale, apply.
pub async fn request_compound(
    State(state): State<AppState>,
    AxumPath(compound): AxumPath<String>,
    Json(request): Json<CompoundRequest>,
) -> SoilMapResult<Json<CompoundResponse>> {
    let compound: Compound = compound.parse()?;
    let coords = parse_coordinates(&request.coords_text)?;

    let (ticket, loading) = {
        let mut view = state.view();
        let ticket = view.begin_request(compound)?;
        view.draw_polygon(&coords);
        (ticket, view.loading)
    };
    state.publish(ViewEvent::loading_changed(compound, loading));
    info!("Requesting {} for {} coordinates", compound, coords.len());

    let result = state.client.fetch_compound(compound, &coords).await;

    let (outcome, snapshot) = {
        let mut view = state.view();
        let outcome = match result {
            Ok(ApiResponse::Success(points)) => {
                let applied = view.apply_points(ticket, &points);
                if !applied {
                    debug!("Discarding stale {} result", compound);
                }
                Ok((points.len(), applied))
            }
            Ok(ApiResponse::Failure(message)) => Err(SoilMapError::Backend(message)),
            Err(e) => Err(e),
        };
        view.finish_request(ticket);
        (outcome, view.snapshot())
    };

    state.publish(ViewEvent::loading_changed(compound, snapshot.loading));
    match outcome {
        Ok((points, applied)) => {
            info!("Received {} {} points", points, compound);
            if applied {
                state.publish(ViewEvent::heatmap_updated(compound, points));
            } else {
                state.publish(ViewEvent::result_discarded(compound, points));
            }
            Ok(Json(CompoundResponse {
                stale: !applied,
                view: snapshot,
            }))
        }
        Err(e) => {
            state.publish(ViewEvent::request_failed(compound, e.to_string()));
            Err(e)
        }
    }
}

/// Pass-through to the sand upstream; status and body are returned as-is.
///
/// The body is read as raw bytes whatever its content type. It only has to
/// parse as JSON.
pub async fn proxy_sand(State(state): State<AppState>, body: Bytes) -> SoilMapResult<Response> {
    serde_json::from_slice::<IgnoredAny>(&body)
        .map_err(|e| SoilMapError::InvalidBody(e.to_string()))?;

    let forwarded = state.client.forward_sand(body).await?;
    let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json")],
        forwarded.body,
    )
        .into_response())
}

// SSE endpoint for loading and heat map updates
pub async fn view_events_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::channel(100);
    let mut event_receiver = state.event_sender.subscribe();

    tokio::spawn(async move {
        loop {
            match event_receiver.recv().await {
                Ok(view_event) => {
                    let sse_event = SseEvent::default()
                        .json_data(&view_event)
                        .unwrap_or_else(|_| SseEvent::default().data("Error serializing event"));

                    if tx.send(Ok(sse_event)).await.is_err() {
                        break; // Client disconnected
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("SSE client lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("keepalive-message"),
    )
}
