//! Connection-Registry – Wer ist gerade verbunden, und als wer?
//!
//! Die Registry besitzt die Zuordnung ConnectionId -> authentifizierter
//! Benutzer exklusiv. Eintraege entstehen nur nach erfolgreichem Handshake
//! und verschwinden bedingungslos beim Disconnect, egal aus welchem Grund.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tradepost_core::{ConnectionId, UserId};

/// Eintrag einer authentifizierten Verbindung
#[derive(Debug, Clone)]
pub struct VerbundenerClient {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    /// Anzeigename, stempelt ausgehende Chat-Nachrichten
    pub full_name: String,
}

/// Verwaltet die Praesenz aller authentifizierten Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
/// Mutationen einzelner Eintraege sind serialisiert; nebenlaeufige Events
/// fuer verschiedene Verbindungen koennen die Map nicht korrumpieren.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<ConnectionRegistryInner>,
}

struct ConnectionRegistryInner {
    /// Alle verbundenen Clients, indiziert nach ConnectionId
    clients: DashMap<ConnectionId, VerbundenerClient>,
}

impl ConnectionRegistry {
    /// Erstellt eine neue leere Registry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(ConnectionRegistryInner {
                clients: DashMap::new(),
            }),
        }
    }

    /// Registriert eine authentifizierte Verbindung
    ///
    /// Eine wiederverwendete ConnectionId ueberschreibt den alten Eintrag
    /// idempotent.
    pub fn registrieren(&self, client: VerbundenerClient) {
        let connection_id = client.connection_id;
        let user_id = client.user_id;
        self.inner.clients.insert(connection_id, client);

        tracing::info!(
            connection_id = %connection_id,
            user_id = %user_id,
            "Client verbunden"
        );
    }

    /// Entfernt eine Verbindung (No-op wenn unbekannt)
    pub fn entfernen(&self, connection_id: &ConnectionId) {
        if self.inner.clients.remove(connection_id).is_some() {
            tracing::info!(connection_id = %connection_id, "Client getrennt");
        }
    }

    /// Snapshot der verbundenen Benutzer-IDs, ohne Duplikate
    ///
    /// Haelt ein Benutzer mehrere Verbindungen offen, erscheint er einmal.
    pub fn verbundene_benutzer(&self) -> Vec<UserId> {
        let mut gesehen = HashSet::new();
        self.inner
            .clients
            .iter()
            .map(|e| e.value().user_id)
            .filter(|uid| gesehen.insert(*uid))
            .collect()
    }

    /// Anzeigename der Verbindung, falls registriert
    pub fn full_name_von(&self, connection_id: &ConnectionId) -> Option<String> {
        self.inner
            .clients
            .get(connection_id)
            .map(|e| e.full_name.clone())
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn anzahl(&self) -> usize {
        self.inner.clients.len()
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_verbunden(&self, connection_id: &ConnectionId) -> bool {
        self.inner.clients.contains_key(connection_id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(connection_id: ConnectionId, user_id: UserId, name: &str) -> VerbundenerClient {
        VerbundenerClient {
            connection_id,
            user_id,
            full_name: name.to_string(),
        }
    }

    #[test]
    fn registrieren_und_entfernen() {
        let registry = ConnectionRegistry::neu();
        let conn = ConnectionId::new();
        let uid = UserId::new();

        registry.registrieren(test_client(conn, uid, "Alice"));
        assert!(registry.ist_verbunden(&conn));
        assert_eq!(registry.anzahl(), 1);
        assert_eq!(registry.full_name_von(&conn).as_deref(), Some("Alice"));

        registry.entfernen(&conn);
        assert!(!registry.ist_verbunden(&conn));
        assert_eq!(registry.anzahl(), 0);
        assert!(registry.full_name_von(&conn).is_none());
    }

    #[test]
    fn entfernen_unbekannter_verbindung_ist_noop() {
        let registry = ConnectionRegistry::neu();
        registry.entfernen(&ConnectionId::new());
        assert_eq!(registry.anzahl(), 0);
    }

    #[test]
    fn wiederverwendete_connection_id_ueberschreibt() {
        let registry = ConnectionRegistry::neu();
        let conn = ConnectionId::new();

        registry.registrieren(test_client(conn, UserId::new(), "Alt"));
        registry.registrieren(test_client(conn, UserId::new(), "Neu"));

        assert_eq!(registry.anzahl(), 1);
        assert_eq!(registry.full_name_von(&conn).as_deref(), Some("Neu"));
    }

    #[test]
    fn verbundene_benutzer_sind_distinct() {
        let registry = ConnectionRegistry::neu();
        let uid = UserId::new();

        // Derselbe Benutzer mit zwei Verbindungen, dazu ein zweiter Benutzer
        registry.registrieren(test_client(ConnectionId::new(), uid, "Doppelt"));
        registry.registrieren(test_client(ConnectionId::new(), uid, "Doppelt"));
        registry.registrieren(test_client(ConnectionId::new(), UserId::new(), "Einzeln"));

        let benutzer = registry.verbundene_benutzer();
        assert_eq!(benutzer.len(), 2);
        assert_eq!(benutzer.iter().filter(|u| **u == uid).count(), 1);
    }

    #[test]
    fn clone_teilt_inneren_state() {
        let r1 = ConnectionRegistry::neu();
        let r2 = r1.clone();
        let conn = ConnectionId::new();

        r1.registrieren(test_client(conn, UserId::new(), "Shared"));
        assert!(r2.ist_verbunden(&conn));
    }
}
