//! Signierte Bearer-Tokens (HS256)
//!
//! Der TokenService stellt kurzlebige, signierte Tokens aus und prueft sie.
//! Er haelt keinen veraenderlichen Zustand: gleiche Eingaben, gleicher
//! Schluessel und gleiche Uhr ergeben dasselbe Ergebnis, beliebig
//! nebenlaeufig aufrufbar.
//!
//! Die Claims tragen bewusst NUR die Subject-ID. Rollen und Profil werden
//! bei jeder Pruefung frisch aus der Datenbank gelesen, damit
//! Rollenaenderungen ohne Token-Invalidierung beim naechsten Request
//! greifen.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Standard-Gueltigkeit ausgestellter Tokens: 2 Stunden
pub const TOKEN_GUELTIGKEIT_MINUTEN: i64 = 120;

/// Die im Token eingebetteten Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: die Benutzer-ID
    pub sub: Uuid,
    /// Ausstellungszeitpunkt (Unix-Sekunden)
    pub iat: i64,
    /// Ablaufzeitpunkt (Unix-Sekunden)
    pub exp: i64,
}

/// Stellt Tokens aus und prueft sie gegen das prozessweite Geheimnis
///
/// Das Geheimnis kommt aus der Startkonfiguration und wird nach der
/// Konstruktion nicht mehr veraendert.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    gueltigkeit: chrono::Duration,
}

impl TokenService {
    /// Erstellt einen TokenService mit dem gegebenen Geheimnis und der
    /// Token-Gueltigkeit in Minuten
    pub fn neu(geheimnis: &str, gueltigkeit_minuten: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(geheimnis.as_bytes()),
            decoding: DecodingKey::from_secret(geheimnis.as_bytes()),
            gueltigkeit: chrono::Duration::minutes(gueltigkeit_minuten),
        }
    }

    /// Stellt ein signiertes Token fuer das Subject aus
    pub fn ausstellen(&self, subject: Uuid) -> AuthResult<String> {
        let jetzt = Utc::now();
        let claims = TokenClaims {
            sub: subject,
            iat: jetzt.timestamp(),
            exp: (jetzt + self.gueltigkeit).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(fehler = %e, "Token-Ausstellung fehlgeschlagen");
            AuthError::TokenUngueltig
        })
    }

    /// Prueft ein Token und gibt die Subject-ID zurueck
    ///
    /// Falsche Signatur, kaputtes Format und abgelaufene Tokens fallen alle
    /// auf [`AuthError::TokenUngueltig`] zusammen; keine Seiteneffekte.
    pub fn pruefen(&self, token: &str) -> AuthResult<Uuid> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::TokenUngueltig)
    }
}
