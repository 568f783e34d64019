use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod events;
pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{
    get_view, index_html, proxy_sand, request_compound, script_js, set_zoom, style_css,
    view_events_stream,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/view", get(get_view))
        .route("/api/zoom", post(set_zoom))
        .route("/api/compound/:compound", post(request_compound))
        .route("/api/sand", post(proxy_sand))
        .route("/api/events", get(view_events_stream))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("✅ HTTP server started at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown requested");
}
