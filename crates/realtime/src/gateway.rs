//! Chat-Gateway – Verbindungs-Lifecycle und Nachrichten-Broadcast
//!
//! Das Gateway verbindet die drei Bausteine des Realtime-Pfads:
//! Identitaetsaufloesung (AuthService), Praesenz (ConnectionRegistry) und
//! Zustellung (EventBroadcaster).
//!
//! ## State Machine pro Verbindung
//! ```text
//! Unauthenticated -> Authenticated -> Removed
//! ```
//! Ein fehlgeschlagener Handshake geht direkt zu Removed, ohne je
//! registriert zu werden; es gibt keinen Retry-Zustand.

use std::sync::Arc;

use tokio::sync::mpsc;
use tradepost_auth::AuthService;
use tradepost_core::{ConnectionId, UserId};
use tradepost_db::repository::UserRepository;

use crate::broadcast::EventBroadcaster;
use crate::error::RealtimeResult;
use crate::events::{ChatNachricht, NeueNachricht, ServerEvent};
use crate::registry::{ConnectionRegistry, VerbundenerClient};

/// Gateway fuer authentifizierte Realtime-Verbindungen
pub struct MessagesGateway<U: UserRepository> {
    auth: Arc<AuthService<U>>,
    registry: ConnectionRegistry,
    broadcaster: EventBroadcaster,
}

impl<U: UserRepository> MessagesGateway<U> {
    /// Erstellt ein neues Gateway
    pub fn neu(auth: Arc<AuthService<U>>) -> Self {
        Self {
            auth,
            registry: ConnectionRegistry::neu(),
            broadcaster: EventBroadcaster::neu(),
        }
    }

    /// Verarbeitet den Handshake einer neuen Verbindung
    ///
    /// Bei jedem Verifikationsfehler wird nichts registriert; die
    /// Transportschicht trennt die Verbindung kommentarlos. Bei Erfolg
    /// entsteht genau ein Registry-Eintrag und alle Verbindungen –
    /// einschliesslich der neuen – bekommen die aktualisierte Client-Liste.
    ///
    /// Gibt die Empfangs-Queue der Verbindung zurueck; die Transportschicht
    /// pumpt sie auf den Socket.
    pub async fn verbindung_oeffnen(
        &self,
        connection_id: ConnectionId,
        token: &str,
    ) -> RealtimeResult<mpsc::Receiver<ServerEvent>> {
        let benutzer = match self.auth.identitaet_pruefen(token).await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    fehler = %e,
                    "Handshake abgelehnt"
                );
                return Err(e.into());
            }
        };

        let rx = self.broadcaster.registrieren(connection_id);
        self.registry.registrieren(VerbundenerClient {
            connection_id,
            user_id: UserId(benutzer.id),
            full_name: benutzer.full_name,
        });

        self.client_liste_senden();
        Ok(rx)
    }

    /// Verarbeitet das Ende einer Verbindung
    ///
    /// Entfernt bedingungslos (No-op falls der Handshake nie durchging)
    /// und verteilt die aktualisierte Client-Liste an die Verbliebenen.
    pub fn verbindung_schliessen(&self, connection_id: &ConnectionId) {
        self.registry.entfernen(connection_id);
        self.broadcaster.entfernen(connection_id);
        self.client_liste_senden();
    }

    /// Verarbeitet eine eingehende Chat-Nachricht
    ///
    /// Stempelt den Anzeigenamen des Absenders aus der Registry und sendet
    /// an alle verbundenen Clients, den Absender eingeschlossen. Es wird
    /// keine History gefuehrt; Zustellung ist best-effort.
    pub fn nachricht_verarbeiten(&self, connection_id: &ConnectionId, nachricht: NeueNachricht) {
        let full_name = match self.registry.full_name_von(connection_id) {
            Some(name) => name,
            None => {
                tracing::warn!(
                    connection_id = %connection_id,
                    "Nachricht von unregistrierter Verbindung verworfen"
                );
                return;
            }
        };

        let gesendet = self
            .broadcaster
            .an_alle_senden(ServerEvent::MessageFromServer(ChatNachricht {
                full_name,
                message: nachricht.text().to_string(),
            }));

        tracing::debug!(
            connection_id = %connection_id,
            empfaenger = gesendet,
            "Chat-Nachricht verteilt"
        );
    }

    /// Snapshot der verbundenen Benutzer (fuer die Verwaltungs-API)
    pub fn verbundene_benutzer(&self) -> Vec<UserId> {
        self.registry.verbundene_benutzer()
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn verbindungs_anzahl(&self) -> usize {
        self.registry.anzahl()
    }

    fn client_liste_senden(&self) {
        let benutzer = self.registry.verbundene_benutzer();
        self.broadcaster
            .an_alle_senden(ServerEvent::ClientsUpdated(benutzer));
    }
}
