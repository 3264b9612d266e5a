//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use noir_studio::studio::Studio;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::error;

use crate::api::{self, AppState};
use crate::broadcast::WsMessage;
use crate::ws::{self, WsState};

/// Build the full axum router.
///
/// The router serves:
/// - WebSocket at `/ws`
/// - REST API at `/api/*`
/// - Optional static files for a bundled front end
pub fn build_router(
    studio: Arc<Studio>,
    broadcast_tx: broadcast::Sender<WsMessage>,
    static_dir: Option<PathBuf>,
) -> Router {
    let app_state = AppState {
        studio: studio.clone(),
        broadcast_tx: broadcast_tx.clone(),
    };
    let ws_state = WsState {
        studio,
        broadcast_tx,
    };

    // Permissive CORS so a front end served from another port can call in.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .with_state(ws_state);

    let api_routes = Router::new()
        .route("/api/features", get(api::get_features))
        .route("/api/features/{id}/schema", get(api::get_schema))
        .route("/api/generate/{id}", post(api::post_generate))
        .route("/api/art-prompt", post(api::post_art_prompt))
        .route("/api/image", post(api::post_image))
        .route("/api/batch/{kind}", post(api::post_batch))
        .route("/api/matrix", get(api::get_matrix))
        .route("/api/export", post(api::post_export))
        .route("/api/chat", post(api::post_chat))
        .with_state(app_state);

    let mut router = Router::new().merge(ws_routes).merge(api_routes).layer(cors);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind, spawn the server task, and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("web server stopped: {e}");
        }
    });

    Ok(addr)
}
