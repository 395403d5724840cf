//! Sumito Server - multiplayer room relay
//!
//! This crate provides the online-play backend:
//! - Room store keyed by short join codes (create / join / expire)
//! - Move-message forwarding, validated through the core engine
//! - AI replies for player-vs-AI rooms, run off the request path
//!
//! The relay has no game logic of its own; every move goes through
//! `sumito_core` and invalid messages never touch a board.

mod routes;
mod state;

pub use state::{Room, RoomError, ServerState, ROOM_TTL};

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// How often the background sweeper expires idle rooms
const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8002 }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Room lifecycle
        .route("/api/rooms", post(routes::rooms::create_room))
        .route("/api/rooms/:code/join", post(routes::rooms::join_room))
        .route(
            "/api/rooms/:code",
            get(routes::rooms::get_room).delete(routes::rooms::close_room),
        )
        // Move relay
        .route("/api/rooms/:code/move", post(routes::rooms::post_move))
        // Browsers talk to the relay cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new());

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.purge_expired();
        }
    });

    let router = create_router(state);

    tracing::info!("Sumito relay starting on http://0.0.0.0:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
