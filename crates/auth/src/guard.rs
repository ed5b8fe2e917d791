//! Rollen-Guard – Zugriffspruefung an der Request-Grenze
//!
//! Geschuetzte Operationen deklarieren eine Menge akzeptierter Rollen in
//! der [`RollenTabelle`]; die Pruefung selbst ist eine reine Funktion ohne
//! Seiteneffekte und veraendert weder Identitaet noch Rollen.

use std::collections::HashMap;

use tradepost_core::Rolle;
use tradepost_db::models::BenutzerRecord;

use crate::error::{AuthError, AuthResult};

/// Prueft ob die Identitaet eine der geforderten Rollen traegt
///
/// - Leere Anforderung: Authentifizierung allein genuegt – das gilt
///   absichtlich auch ohne aufgeloeste Identitaet (deklarierte Operation
///   ohne Rollen verhaelt sich wie eine nicht deklarierte).
/// - Fehlende Identitaet bei nicht-leerer Anforderung ist ein
///   Programmierfehler im Aufrufpfad, kein gewoehnlicher Auth-Fehler.
pub fn zugriff_pruefen(
    identitaet: Option<&BenutzerRecord>,
    erforderlich: &[Rolle],
) -> AuthResult<()> {
    if erforderlich.is_empty() {
        return Ok(());
    }

    let benutzer = identitaet.ok_or(AuthError::IdentitaetFehlt)?;

    if benutzer.roles.iter().any(|r| erforderlich.contains(r)) {
        return Ok(());
    }

    Err(AuthError::RolleFehlt {
        benutzer: benutzer.full_name.clone(),
        erforderlich: erforderlich.to_vec(),
    })
}

/// Statische Tabelle: Operations-Kennung -> geforderte Rollen
///
/// Wird einmal beim Start aufgebaut und beim Dispatch konsultiert.
/// Nicht eingetragene Operationen gelten als "nur authentifiziert".
#[derive(Debug, Default)]
pub struct RollenTabelle {
    eintraege: HashMap<&'static str, Vec<Rolle>>,
}

impl RollenTabelle {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Traegt eine Operation mit ihren akzeptierten Rollen ein
    pub fn mit(mut self, operation: &'static str, rollen: &[Rolle]) -> Self {
        self.eintraege.insert(operation, rollen.to_vec());
        self
    }

    /// Geforderte Rollen einer Operation; leer wenn nicht eingetragen
    pub fn erforderlich(&self, operation: &str) -> &[Rolle] {
        self.eintraege
            .get(operation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn benutzer_mit_rollen(rollen: Vec<Rolle>) -> BenutzerRecord {
        BenutzerRecord {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            full_name: "Test".into(),
            password_hash: "hash".into(),
            roles: rollen,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn leere_anforderung_erlaubt_immer() {
        // Auch ganz ohne Identitaet – siehe Funktionsdoku
        assert!(zugriff_pruefen(None, &[]).is_ok());

        let benutzer = benutzer_mit_rollen(vec![Rolle::User]);
        assert!(zugriff_pruefen(Some(&benutzer), &[]).is_ok());
    }

    #[test]
    fn fehlende_identitaet_ist_programmierfehler() {
        let ergebnis = zugriff_pruefen(None, &[Rolle::Admin]);
        assert!(matches!(ergebnis, Err(AuthError::IdentitaetFehlt)));
    }

    #[test]
    fn passende_rolle_erlaubt() {
        let benutzer = benutzer_mit_rollen(vec![Rolle::Admin]);
        assert!(zugriff_pruefen(Some(&benutzer), &[Rolle::Admin]).is_ok());

        // Eine von mehreren geforderten Rollen genuegt
        let benutzer = benutzer_mit_rollen(vec![Rolle::SuperUser]);
        assert!(zugriff_pruefen(Some(&benutzer), &[Rolle::Admin, Rolle::SuperUser]).is_ok());
    }

    #[test]
    fn fehlende_rolle_verweigert_mit_kontext() {
        let benutzer = benutzer_mit_rollen(vec![Rolle::User]);
        let ergebnis = zugriff_pruefen(Some(&benutzer), &[Rolle::Admin]);

        match ergebnis {
            Err(AuthError::RolleFehlt {
                benutzer: name,
                erforderlich,
            }) => {
                assert_eq!(name, "Test");
                assert_eq!(erforderlich, vec![Rolle::Admin]);
            }
            other => panic!("Erwartet RolleFehlt, erhalten: {other:?}"),
        }
    }

    #[test]
    fn pruefung_veraendert_identitaet_nicht() {
        let benutzer = benutzer_mit_rollen(vec![Rolle::User]);
        let rollen_vorher = benutzer.roles.clone();

        let _ = zugriff_pruefen(Some(&benutzer), &[Rolle::Admin]);
        assert_eq!(benutzer.roles, rollen_vorher);
    }

    #[test]
    fn rollen_tabelle_lookup() {
        let tabelle = RollenTabelle::neu()
            .mit("clients:list", &[Rolle::Admin, Rolle::SuperUser])
            .mit("auth:check-status", &[]);

        assert_eq!(
            tabelle.erforderlich("clients:list"),
            &[Rolle::Admin, Rolle::SuperUser]
        );
        assert!(tabelle.erforderlich("auth:check-status").is_empty());
        // Unbekannte Operation == leere Anforderung
        assert!(tabelle.erforderlich("nirgends:deklariert").is_empty());
    }
}
