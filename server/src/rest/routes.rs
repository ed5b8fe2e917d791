//! Route-Definitionen fuer die REST-API und den WebSocket-Endpunkt

use axum::{
    routing::{get, post},
    Router,
};

use crate::rest::{handlers, AppState};
use crate::ws;

/// Erstellt den vollstaendigen Router
pub fn router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/check-status", get(handlers::check_status))
        // Verwaltung
        .route("/clients", get(handlers::list_clients))
        // Realtime
        .route("/ws", get(ws::ws_handler))
        // Health
        .route("/health", get(handlers::health))
}
