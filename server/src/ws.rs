//! WebSocket-Transport fuer das Chat-Gateway
//!
//! Jede Verbindung bekommt einen eigenen tokio-Task. Das Handshake-Token
//! kommt aus dem `Authentication`-Header; Browser-Clients koennen keine
//! eigenen Header setzen und nutzen stattdessen `?token=`.
//!
//! Scheitert der Handshake, wird der Socket kommentarlos geschlossen –
//! der Peer sieht nur den Transport-Disconnect.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use tradepost_core::ConnectionId;
use tradepost_realtime::ClientEvent;

use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// GET /ws – Upgrade auf WebSocket
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = headers
        .get("authentication")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or(params.token);

    ws.on_upgrade(move |socket| verbindung_betreuen(socket, state, token))
}

/// Betreut eine einzelne WebSocket-Verbindung bis zum Disconnect
async fn verbindung_betreuen(socket: WebSocket, state: AppState, token: Option<String>) {
    let connection_id = ConnectionId::new();

    let token = match token {
        Some(t) => t,
        None => {
            tracing::debug!(connection_id = %connection_id, "Handshake ohne Token");
            let _ = socket.close().await;
            return;
        }
    };

    // Handshake: Identitaet aufloesen und Verbindung registrieren.
    // Jeder Fehler endet im sofortigen Disconnect ohne Fehlermeldung.
    let mut empfang = match state.gateway.verbindung_oeffnen(connection_id, &token).await {
        Ok(rx) => rx,
        Err(_) => {
            let _ = socket.close().await;
            return;
        }
    };

    let (mut schreiber, mut leser) = socket.split();

    loop {
        tokio::select! {
            // Ausgehendes Event aus dem Broadcaster
            Some(event) = empfang.recv() => {
                let text = match serde_json::to_string(&event) {
                    Ok(t) => t,
                    Err(e) => {
                        tracing::error!(fehler = %e, "Event nicht serialisierbar");
                        continue;
                    }
                };
                if schreiber.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }

            // Eingehender Frame vom Client
            frame = leser.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(ClientEvent::MessageFromClient(nachricht)) => {
                                state.gateway.nachricht_verarbeiten(&connection_id, nachricht);
                            }
                            Err(e) => {
                                tracing::debug!(
                                    connection_id = %connection_id,
                                    fehler = %e,
                                    "Unverstandenes Client-Event verworfen"
                                );
                            }
                        }
                    }
                    // Ping/Pong beantwortet axum selbst, Binary ignorieren
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(
                            connection_id = %connection_id,
                            fehler = %e,
                            "WebSocket-Lesefehler"
                        );
                        break;
                    }
                }
            }
        }
    }

    // Cleanup laeuft bedingungslos, egal wie die Verbindung endete
    state.gateway.verbindung_schliessen(&connection_id);
    tracing::debug!(connection_id = %connection_id, "Verbindungs-Task beendet");
}
