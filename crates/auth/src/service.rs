//! Auth-Service fuer Tradepost
//!
//! Zentraler Service fuer Registrierung, Login, Status-Erneuerung und die
//! gemeinsame Identitaetsaufloesung von HTTP- und Realtime-Pfad.
//! Nutzt das UserRepository, den Passwort-Hasher und den TokenService.

use std::sync::Arc;

use serde::Serialize;
use tradepost_core::Rolle;
use uuid::Uuid;

use tradepost_db::{
    models::{email_normalisieren, BenutzerRecord, NeuerBenutzer},
    repository::UserRepository,
};

use crate::{
    error::{AnmeldeDetail, AuthError, AuthResult},
    password::{passwort_hashen, passwort_verifizieren},
    token::TokenService,
};

/// Benutzerprofil wie es an Aufrufer geht – ohne Passwort-Hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenutzerProfil {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Rolle>,
    pub is_active: bool,
}

impl From<BenutzerRecord> for BenutzerProfil {
    fn from(record: BenutzerRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            full_name: record.full_name,
            roles: record.roles,
            is_active: record.is_active,
        }
    }
}

/// Ergebnis von Registrierung, Login und Status-Erneuerung
#[derive(Debug, Clone, Serialize)]
pub struct AngemeldeterBenutzer {
    #[serde(flatten)]
    pub profil: BenutzerProfil,
    pub token: String,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository> AuthService<U> {
    /// Erstellt einen neuen AuthService
    pub fn neu(user_repo: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { user_repo, tokens }
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Kein Vorab-Lookup: der Unique-Index auf der E-Mail entscheidet.
    /// Die Normalisierung der E-Mail uebernimmt der Insert-Pfad des Stores.
    pub async fn registrieren(
        &self,
        email: &str,
        passwort: &str,
        full_name: &str,
    ) -> AuthResult<AngemeldeterBenutzer> {
        let passwort_hash = passwort_hashen(passwort)?;

        let benutzer = self
            .user_repo
            .create(NeuerBenutzer {
                email,
                full_name,
                password_hash: &passwort_hash,
            })
            .await
            .map_err(|e| {
                if e.ist_eindeutigkeit() {
                    AuthError::EmailVergeben(email_normalisieren(email))
                } else {
                    tracing::error!(fehler = %e, "Registrierung: Persistenz fehlgeschlagen");
                    AuthError::Persistenz(e)
                }
            })?;

        tracing::info!(
            user_id = %benutzer.id,
            email = %benutzer.email,
            "Neuer Benutzer registriert"
        );

        let token = self.tokens.ausstellen(benutzer.id)?;
        Ok(AngemeldeterBenutzer {
            profil: benutzer.into(),
            token,
        })
    }

    /// Meldet einen Benutzer an und stellt ein frisches Token aus
    ///
    /// "E-Mail unbekannt" und "Passwort falsch" tragen nach aussen dieselbe
    /// Meldung; das interne Detail unterscheidet die Faelle fuer Logs und
    /// Tests.
    pub async fn anmelden(&self, email: &str, passwort: &str) -> AuthResult<AngemeldeterBenutzer> {
        let email_norm = email_normalisieren(email);

        let benutzer = match self.user_repo.find_by_email(&email_norm).await? {
            Some(b) => b,
            None => {
                tracing::warn!(email = %email_norm, detail = "email", "Fehlgeschlagener Login");
                return Err(AuthError::UngueltigeAnmeldedaten {
                    detail: AnmeldeDetail::Email,
                });
            }
        };

        if !passwort_verifizieren(passwort, &benutzer.password_hash) {
            tracing::warn!(email = %email_norm, detail = "passwort", "Fehlgeschlagener Login");
            return Err(AuthError::UngueltigeAnmeldedaten {
                detail: AnmeldeDetail::Passwort,
            });
        }

        self.user_repo.update_last_login(benutzer.id).await?;

        tracing::info!(user_id = %benutzer.id, email = %benutzer.email, "Benutzer angemeldet");

        let token = self.tokens.ausstellen(benutzer.id)?;
        Ok(AngemeldeterBenutzer {
            profil: benutzer.into(),
            token,
        })
    }

    /// Stellt fuer eine bereits aufgeloeste Identitaet ein brandneues Token aus
    ///
    /// Damit verlaengern langlebige Realtime-Sessions ihre kurzlebigen
    /// Tokens ohne erneute Credential-Eingabe. Das alte Token bleibt bis zu
    /// seinem eigenen Ablauf gueltig.
    pub fn status_erneuern(&self, benutzer: &BenutzerRecord) -> AuthResult<AngemeldeterBenutzer> {
        let token = self.tokens.ausstellen(benutzer.id)?;
        Ok(AngemeldeterBenutzer {
            profil: benutzer.clone().into(),
            token,
        })
    }

    /// Loest ein rohes Token zur vollen Identitaet auf
    ///
    /// Gemeinsamer Pfad fuer HTTP-Requests und den Realtime-Handshake.
    /// Der Benutzer wird bei JEDER Pruefung frisch geladen – Rollenaenderungen
    /// greifen damit beim naechsten authentifizierten Aufruf.
    pub async fn identitaet_pruefen(&self, token: &str) -> AuthResult<BenutzerRecord> {
        let subject = self.tokens.pruefen(token)?;

        self.user_repo
            .get_by_id(subject)
            .await?
            .ok_or_else(|| AuthError::IdentitaetVerwaist(subject.to_string()))
    }
}
