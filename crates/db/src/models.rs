//! Datenbankmodelle fuer Tradepost
//!
//! Diese Typen repraesentieren Benutzer-Datensaetze aus der Datenbank.
//! Sie sind von den API-Typen getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradepost_core::Rolle;
use uuid::Uuid;

/// Normalisiert eine E-Mail-Adresse: Whitespace entfernen, Kleinschreibung.
///
/// Wird auf JEDEM Schreibpfad (Insert und Update) sowie vor jedem Lookup
/// angewendet, damit `" A@B.com "` und `"a@b.com"` denselben Datensatz
/// treffen.
pub fn email_normalisieren(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<Rolle>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Daten zum Erstellen eines neuen Benutzers
///
/// Neue Konten starten aktiv mit der Basis-Rolle [`Rolle::User`].
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
}

/// Daten zum Aktualisieren eines Benutzers
///
/// `full_name` ist nach der Erstellung unveraenderlich und fehlt hier
/// absichtlich.
#[derive(Debug, Clone, Default)]
pub struct BenutzerUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub roles: Option<Vec<Rolle>>,
    pub is_active: Option<bool>,
    pub last_login: Option<DateTime<Utc>>,
}
