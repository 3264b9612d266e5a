//! HTTP and WebSocket surface for the Neo-Tokyo Noir studio.
//!
//! `noir-web` wraps a [`Studio`] in an axum server: a REST API for every
//! feature and a WebSocket that streams batch progress. It is meant to sit
//! behind a browser front end but works with any HTTP client.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use noir_studio::prelude::*;
//! use noir_web::{WebConfig, spawn_web};
//!
//! let client = OpenRouterClient::from_config(api_key_from_env()?, &StudioConfig::default())?;
//! let studio = Arc::new(Studio::new(CompletionClient::new(client)));
//! let (addr, _ws_tx) = spawn_web(studio, WebConfig::default()).await?;
//! println!("Studio: http://{addr}");
//! ```
//!
//! # Architecture
//!
//! ```text
//! HTTP client ──/api/*──▶ Studio ──BatchEvent──▶ BroadcastObserver ──WsMessage──▶ /ws clients
//! ```
//!
//! Batch runs are observed by a [`BroadcastObserver`] composed with
//! [`LoggingObserver`](noir_studio::batch::LoggingObserver), so progress is
//! both logged and pushed to every connected socket.

mod api;
pub mod broadcast;
mod server;
mod ws;

pub use api::{ApiError, ExportRequest, FeatureInfo};
pub use broadcast::{BroadcastObserver, WsMessage};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use noir_studio::studio::Studio;
use tokio::sync::broadcast::Sender;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Directory of static front-end files, served as the fallback route.
    ///
    /// If `None`, only API/WS endpoints are served.
    pub static_dir: Option<PathBuf>,
    /// WebSocket broadcast channel capacity. Default: 256.
    ///
    /// Clients that fall behind by this many messages receive a fresh
    /// snapshot to resynchronize.
    pub broadcast_capacity: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            static_dir: None,
            broadcast_capacity: 256,
        }
    }
}

/// Spawn the web server on a Tokio task.
///
/// Returns the bound address and the sender side of the WebSocket broadcast
/// channel, for callers that want to push their own messages. The server
/// runs until the Tokio runtime shuts down.
pub async fn spawn_web(
    studio: Arc<Studio>,
    config: WebConfig,
) -> std::io::Result<(SocketAddr, Sender<WsMessage>)> {
    let (ws_tx, _) = tokio::sync::broadcast::channel(config.broadcast_capacity);
    let router = server::build_router(studio, ws_tx.clone(), config.static_dir);
    let addr = server::start_server(router, config.bind_addr).await?;
    Ok((addr, ws_tx))
}
