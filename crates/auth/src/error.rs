//! Fehlertypen fuer den Auth-Service

use thiserror::Error;
use tradepost_core::Rolle;

/// Unterscheidet intern, woran ein Login gescheitert ist.
///
/// Nach aussen tragen beide Faelle dieselbe Fehlermeldung, damit sich aus
/// der Antwort nicht ablesen laesst ob ein Konto existiert. Das Tag dient
/// nur Logging und Tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnmeldeDetail {
    Email,
    Passwort,
}

impl AnmeldeDetail {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Passwort => "passwort",
        }
    }
}

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Registrierung ---
    #[error("E-Mail bereits vergeben: {0}")]
    EmailVergeben(String),

    // --- Authentifizierung ---
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten { detail: AnmeldeDetail },

    // --- Token / Identitaet ---
    #[error("Token ungueltig oder abgelaufen")]
    TokenUngueltig,

    #[error("Token verweist auf unbekannten Benutzer: {0}")]
    IdentitaetVerwaist(String),

    // --- Guard ---
    #[error("Keine Identitaet am Request – Guard ohne vorgelagerte Authentifizierung")]
    IdentitaetFehlt,

    #[error("Benutzer {benutzer} benoetigt eine der Rollen: [{rollen}]", rollen = rollen_liste(.erforderlich))]
    RolleFehlt {
        benutzer: String,
        erforderlich: Vec<Rolle>,
    },

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Persistenz(#[from] tradepost_db::DbError),
}

fn rollen_liste(rollen: &[Rolle]) -> String {
    rollen
        .iter()
        .map(Rolle::als_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl AuthError {
    /// HTTP-Statuscode fuer die REST-Schicht
    pub fn http_status(&self) -> u16 {
        match self {
            Self::EmailVergeben(_) => 400,
            Self::UngueltigeAnmeldedaten { .. } => 401,
            Self::TokenUngueltig | Self::IdentitaetVerwaist(_) => 401,
            Self::RolleFehlt { .. } => 403,
            Self::PasswortHashing(_) | Self::IdentitaetFehlt | Self::Persistenz(_) => 500,
        }
    }

    /// Server-Fehler werden nach aussen nur generisch gemeldet;
    /// Details landen ausschliesslich im Log.
    pub fn ist_server_fehler(&self) -> bool {
        self.http_status() >= 500
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
