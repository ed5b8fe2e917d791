//! REST-Handler fuer Auth- und Client-Endpunkte

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use tradepost_auth::zugriff_pruefen;

use crate::rest::{auth_fehler_antwort, identitaet_aus_headers, operationen, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// POST /auth/register – Konto anlegen, Profil + Token zurueck
pub async fn register(State(state): State<AppState>, Json(body): Json<RegisterBody>) -> Response {
    match state
        .auth
        .registrieren(&body.email, &body.password, &body.full_name)
        .await
    {
        Ok(angemeldet) => (StatusCode::CREATED, Json(angemeldet)).into_response(),
        Err(e) => auth_fehler_antwort(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /auth/login – Credentials pruefen, frisches Token ausstellen
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    match state.auth.anmelden(&body.email, &body.password).await {
        Ok(angemeldet) => (StatusCode::OK, Json(angemeldet)).into_response(),
        Err(e) => auth_fehler_antwort(&e),
    }
}

/// GET /auth/check-status – Token erneuern fuer eine aufgeloeste Identitaet
///
/// Damit halten langlebige Clients ihre kurzlebigen Tokens frisch ohne
/// erneute Credential-Eingabe.
pub async fn check_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let benutzer = match identitaet_aus_headers(&headers, &state).await {
        Ok(b) => b,
        Err(r) => return r,
    };

    if let Err(e) = zugriff_pruefen(
        Some(&benutzer),
        state.rollen.erforderlich(operationen::CHECK_STATUS),
    ) {
        return auth_fehler_antwort(&e);
    }

    match state.auth.status_erneuern(&benutzer) {
        Ok(angemeldet) => (StatusCode::OK, Json(angemeldet)).into_response(),
        Err(e) => auth_fehler_antwort(&e),
    }
}

/// GET /clients – verbundene Benutzer auflisten (Admin-Operation)
pub async fn list_clients(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let benutzer = match identitaet_aus_headers(&headers, &state).await {
        Ok(b) => b,
        Err(r) => return r,
    };

    if let Err(e) = zugriff_pruefen(
        Some(&benutzer),
        state.rollen.erforderlich(operationen::CLIENTS_LIST),
    ) {
        return auth_fehler_antwort(&e);
    }

    let clients = state.gateway.verbundene_benutzer();
    (
        StatusCode::OK,
        Json(json!({
            "clients": clients,
            "verbindungen": state.gateway.verbindungs_anzahl()
        })),
    )
        .into_response()
}

/// GET /health – Health-Check-Endpunkt
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
