//! Wire-Events des Chat-Gateways
//!
//! Ereignisse gehen als JSON mit `event`-Tag und `data`-Payload ueber die
//! Leitung, z.B. `{"event":"clients-updated","data":["<uuid>", ...]}`.

use serde::{Deserialize, Serialize};
use tradepost_core::UserId;

/// Platzhaltertext wenn ein Client eine leere Nachricht schickt
const KEINE_NACHRICHT: &str = "no-message!!";

/// Events vom Server an die Clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Liste der aktuell verbundenen Benutzer-IDs (distinct)
    ClientsUpdated(Vec<UserId>),
    /// Chat-Nachricht, gestempelt mit dem Anzeigenamen des Absenders
    MessageFromServer(ChatNachricht),
}

/// Broadcast-Payload einer Chat-Nachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatNachricht {
    pub full_name: String,
    pub message: String,
}

/// Events von Clients an den Server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Eingehende Chat-Nachricht
    MessageFromClient(NeueNachricht),
}

/// Payload einer eingehenden Chat-Nachricht
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeueNachricht {
    pub message: Option<String>,
}

impl NeueNachricht {
    /// Nachrichtentext; leere oder fehlende Nachrichten bekommen einen
    /// Platzhalter
    pub fn text(&self) -> &str {
        self.message
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(KEINE_NACHRICHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn clients_updated_wire_format() {
        let uid = UserId(Uuid::nil());
        let json = serde_json::to_string(&ServerEvent::ClientsUpdated(vec![uid])).unwrap();
        assert!(json.contains("\"event\":\"clients-updated\""));
        assert!(json.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn message_from_server_wire_format() {
        let event = ServerEvent::MessageFromServer(ChatNachricht {
            full_name: "Alice".into(),
            message: "Hallo".into(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"message-from-server\""));
        assert!(json.contains("\"fullName\":\"Alice\""));
        assert!(json.contains("\"message\":\"Hallo\""));
    }

    #[test]
    fn message_from_client_parsen() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"message-from-client","data":{"message":"Hi"}}"#,
        )
        .unwrap();
        let ClientEvent::MessageFromClient(nachricht) = event;
        assert_eq!(nachricht.text(), "Hi");
    }

    #[test]
    fn leere_nachricht_bekommt_platzhalter() {
        assert_eq!(NeueNachricht { message: None }.text(), "no-message!!");
        assert_eq!(
            NeueNachricht {
                message: Some(String::new())
            }
            .text(),
            "no-message!!"
        );
    }
}
