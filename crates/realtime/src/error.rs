//! Fehlertypen fuer den Realtime-Service

use thiserror::Error;
use tradepost_auth::AuthError;

/// Fehlertyp fuer den Realtime-Service
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Handshake- oder Identitaetsfehler
    ///
    /// Fuehrt zum sofortigen Trennen der Verbindung; der Peer bekommt
    /// ausser dem Transport-Disconnect keine Fehlermeldung.
    #[error("Authentifizierungsfehler: {0}")]
    Auth(#[from] AuthError),
}

/// Result-Typ fuer den Realtime-Service
pub type RealtimeResult<T> = Result<T, RealtimeError>;
