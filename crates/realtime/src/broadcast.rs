//! Event-Broadcaster – Sendet Events an alle verbundenen Clients
//!
//! Der EventBroadcaster verwaltet die Send-Queues aller verbundenen Clients.
//! Gesendet wird nicht-blockierend: ein langsamer oder getrennter Peer darf
//! die Zustellung an die uebrigen Clients nie aufhalten.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tradepost_core::ConnectionId;

use crate::events::ServerEvent;

/// Groesse der Send-Queue pro Client
const SEND_QUEUE_GROESSE: usize = 64;

/// Handle auf die Send-Queue eines verbundenen Clients
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub connection_id: ConnectionId,
    pub tx: mpsc::Sender<ServerEvent>,
}

impl ClientSender {
    /// Sendet ein Event nicht-blockierend an den Client
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, event: ServerEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    connection_id = %self.connection_id,
                    "Send-Queue voll – Event verworfen"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(
                    connection_id = %self.connection_id,
                    "Send-Queue geschlossen (Client getrennt)"
                );
                false
            }
        }
    }
}

/// Zentraler Event-Broadcaster fuer alle verbundenen Clients
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct EventBroadcaster {
    inner: Arc<EventBroadcasterInner>,
}

struct EventBroadcasterInner {
    /// Client-Sender, indiziert nach ConnectionId
    clients: DashMap<ConnectionId, ClientSender>,
}

impl EventBroadcaster {
    /// Erstellt einen neuen EventBroadcaster
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(EventBroadcasterInner {
                clients: DashMap::new(),
            }),
        }
    }

    /// Registriert eine neue Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die Transportschicht liest aus dieser Queue und schreibt auf den
    /// Socket. Eine bereits registrierte ConnectionId wird ueberschrieben;
    /// die alte Queue schliesst dadurch.
    pub fn registrieren(&self, connection_id: ConnectionId) -> mpsc::Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let sender = ClientSender { connection_id, tx };
        self.inner.clients.insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "Verbindung im Broadcaster registriert");
        rx
    }

    /// Entfernt eine Verbindung aus dem Broadcaster (No-op wenn unbekannt)
    pub fn entfernen(&self, connection_id: &ConnectionId) {
        self.inner.clients.remove(connection_id);
        tracing::debug!(connection_id = %connection_id, "Verbindung aus Broadcaster entfernt");
    }

    /// Sendet ein Event an eine einzelne Verbindung
    ///
    /// Gibt `true` zurueck wenn die Verbindung gefunden und das Event
    /// eingereiht wurde.
    pub fn an_verbindung_senden(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool {
        match self.inner.clients.get(connection_id) {
            Some(sender) => sender.senden(event),
            None => {
                tracing::debug!(connection_id = %connection_id, "Senden an unbekannte Verbindung");
                false
            }
        }
    }

    /// Sendet ein Event an alle verbundenen Clients
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_alle_senden(&self, event: ServerEvent) -> usize {
        let mut gesendet = 0;
        self.inner.clients.iter().for_each(|entry| {
            if entry.value().senden(event.clone()) {
                gesendet += 1;
            }
        });
        gesendet
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn anzahl(&self) -> usize {
        self.inner.clients.len()
    }

    /// Prueft ob eine Verbindung registriert ist
    pub fn ist_registriert(&self, connection_id: &ConnectionId) -> bool {
        self.inner.clients.contains_key(connection_id)
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChatNachricht;

    fn test_event(text: &str) -> ServerEvent {
        ServerEvent::MessageFromServer(ChatNachricht {
            full_name: "Test".into(),
            message: text.into(),
        })
    }

    #[tokio::test]
    async fn registrieren_und_senden() {
        let broadcaster = EventBroadcaster::neu();
        let conn = ConnectionId::new();

        let mut rx = broadcaster.registrieren(conn);
        assert!(broadcaster.ist_registriert(&conn));

        assert!(broadcaster.an_verbindung_senden(&conn, test_event("hallo")));

        let empfangen = rx.try_recv().expect("Event muss vorhanden sein");
        assert_eq!(empfangen, test_event("hallo"));
    }

    #[tokio::test]
    async fn an_alle_senden() {
        let broadcaster = EventBroadcaster::neu();

        let mut receivers: Vec<_> = (0..5)
            .map(|_| broadcaster.registrieren(ConnectionId::new()))
            .collect();

        let gesendet = broadcaster.an_alle_senden(test_event("rundruf"));
        assert_eq!(gesendet, 5);

        for rx in &mut receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[tokio::test]
    async fn entfernte_verbindung_empfaengt_nichts() {
        let broadcaster = EventBroadcaster::neu();
        let conn = ConnectionId::new();

        let mut rx = broadcaster.registrieren(conn);
        broadcaster.entfernen(&conn);

        assert!(!broadcaster.ist_registriert(&conn));
        assert_eq!(broadcaster.an_alle_senden(test_event("weg")), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn volle_queue_blockiert_andere_nicht() {
        let broadcaster = EventBroadcaster::neu();
        let voll = ConnectionId::new();
        let frei = ConnectionId::new();

        // Queue von `voll` bis zum Rand fuellen, Receiver liest nicht
        let _rx_voll = broadcaster.registrieren(voll);
        let mut rx_frei = broadcaster.registrieren(frei);
        for i in 0..SEND_QUEUE_GROESSE {
            broadcaster.an_verbindung_senden(&voll, test_event(&format!("{i}")));
        }

        // Der Rundruf erreicht den freien Client trotzdem
        let gesendet = broadcaster.an_alle_senden(test_event("durchgekommen"));
        assert_eq!(gesendet, 1);
        assert!(rx_frei.try_recv().is_ok());
    }

    #[tokio::test]
    async fn senden_an_unbekannte_verbindung() {
        let broadcaster = EventBroadcaster::neu();
        assert!(!broadcaster.an_verbindung_senden(&ConnectionId::new(), test_event("nirgendwo")));
    }
}
