//! REST-Schicht: Router, Handler und gemeinsame Hilfen
//!
//! Die Handler loesen die Identitaet am Anfang selbst auf
//! ([`identitaet_aus_headers`]) und konsultieren die Rollen-Tabelle –
//! Identitaet wird explizit durchgereicht, kein impliziter Kontext.

pub mod handlers;
pub mod routes;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use tradepost_auth::{AuthError, AuthService, RollenTabelle};
use tradepost_core::Rolle;
use tradepost_db::{models::BenutzerRecord, SqliteDb};
use tradepost_realtime::MessagesGateway;

/// Operations-Kennungen fuer die Rollen-Tabelle
pub mod operationen {
    pub const CHECK_STATUS: &str = "auth:check-status";
    pub const CLIENTS_LIST: &str = "clients:list";
}

/// Baut die deklarative Tabelle Operation -> geforderte Rollen
///
/// Eine leere Rollenliste heisst "nur authentifiziert".
pub fn rollen_tabelle() -> RollenTabelle {
    RollenTabelle::neu()
        .mit(operationen::CHECK_STATUS, &[])
        .mit(operationen::CLIENTS_LIST, &[Rolle::Admin, Rolle::SuperUser])
}

/// Geteilter Anwendungszustand (thread-safe, Arc-geteilt)
#[derive(Clone)]
pub struct AppState {
    /// Auth-Service (Registrierung, Login, Identitaetsaufloesung)
    pub auth: Arc<AuthService<SqliteDb>>,
    /// Chat-Gateway (Praesenz + Broadcasts)
    pub gateway: Arc<MessagesGateway<SqliteDb>>,
    /// Operation -> geforderte Rollen
    pub rollen: Arc<RollenTabelle>,
}

/// Extrahiert Bearer-Token aus dem Authorization-Header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Fehlerantwort fuer die REST-API
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": nachricht
            }
        })),
    )
        .into_response()
}

/// Bildet einen AuthError auf eine HTTP-Antwort ab
///
/// Client-Fehler behalten ihre Meldung. Server-Fehler werden vollstaendig
/// geloggt, nach aussen geht nur ein generischer Text.
pub fn auth_fehler_antwort(e: &AuthError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if e.ist_server_fehler() {
        tracing::error!(fehler = %e, "Unerwarteter Serverfehler");
        fehler_antwort(status, "Unerwarteter Fehler, bitte Server-Logs pruefen")
    } else {
        fehler_antwort(status, &e.to_string())
    }
}

/// Loest die Identitaet des Requests aus dem Authorization-Header auf
///
/// Liest den Benutzer bei jedem Aufruf frisch aus dem Store, damit
/// Rollenaenderungen sofort greifen.
pub async fn identitaet_aus_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<BenutzerRecord, Response> {
    let token = match bearer_token(headers) {
        Some(t) => t,
        None => {
            return Err(fehler_antwort(
                StatusCode::UNAUTHORIZED,
                "Authorization-Header fehlt",
            ))
        }
    };

    state
        .auth
        .identitaet_pruefen(token)
        .await
        .map_err(|e| auth_fehler_antwort(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extrahieren() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer mein_token_123"),
        );
        assert_eq!(bearer_token(&headers), Some("mein_token_123"));
    }

    #[test]
    fn bearer_token_fehlt() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn rollen_tabelle_deckt_operationen() {
        let tabelle = rollen_tabelle();
        assert!(tabelle.erforderlich(operationen::CHECK_STATUS).is_empty());
        assert_eq!(
            tabelle.erforderlich(operationen::CLIENTS_LIST),
            &[Rolle::Admin, Rolle::SuperUser]
        );
    }
}
