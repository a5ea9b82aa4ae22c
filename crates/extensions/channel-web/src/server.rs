//! HTTP server and routing.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use zegoop_protocols::SurfaceKind;

use crate::{WebChannelState, WebSurface};

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    surface: Option<String>,
}

/// Build the router for the web channel.
pub fn create_router(state: Arc<WebChannelState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/info", get(api_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Surface kind from the `surface` query parameter. Missing means content.
fn surface_kind(params: &ConnectParams) -> Option<SurfaceKind> {
    match params.surface.as_deref() {
        None => Some(SurfaceKind::Content),
        Some(kind) => SurfaceKind::parse(kind).filter(|k| *k != SurfaceKind::Console),
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<WebChannelState>>,
) -> Response {
    let Some(kind) = surface_kind(&params) else {
        return (StatusCode::BAD_REQUEST, "unknown surface kind").into_response();
    };

    ws.on_upgrade(move |socket| async move {
        let id = format!("{}-{}", kind, uuid::Uuid::new_v4());
        debug!("Upgrading connection for {}", id);
        WebSurface::spawn(id, kind, socket, state);
    })
}

async fn health_check(State(state): State<Arc<WebChannelState>>) -> impl IntoResponse {
    let status = if state.started.load(Ordering::SeqCst) {
        "ok"
    } else {
        "starting"
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "status": status,
            "connections": state.connections.len(),
        })
        .to_string(),
    )
}

async fn api_info(State(state): State<Arc<WebChannelState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "name": "Zegoop Web Channel",
            "version": env!("CARGO_PKG_VERSION"),
            "surfaces": state.surfaces.len(),
            "endpoints": {
                "websocket": "/ws?surface=content|popup|options",
                "health": "/health",
                "info": "/api/info"
            }
        })
        .to_string(),
    )
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
