//! Passwort-Hashing mit Argon2id
//!
//! Argon2id ist der empfohlene Algorithmus gemaess OWASP-Richtlinien.
//! Der Arbeitsfaktor ist modulweit fixiert; alle Hashes einer Installation
//! entstehen mit denselben Parametern.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::AuthError;

/// Arbeitsfaktor gemaess OWASP-Empfehlungen (Stand 2024)
const M_COST_KIB: u32 = 64 * 1024; // 64 MiB
const T_COST: u32 = 3; // Iterationen
const P_COST: u32 = 1; // Parallelitaet

fn argon2_instanz() -> Argon2<'static> {
    let params = Params::new(M_COST_KIB, T_COST, P_COST, None)
        .expect("Argon2-Parameter ungueltig");

    Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params)
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_instanz();

    argon2
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Gibt `true` nur bei einem korrekten Passwort zurueck. Ein nicht
/// parsbarer Hash zaehlt als Fehlversuch, nicht als Fehler.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(e) => {
            tracing::debug!(fehler = %e, "Hash nicht parsbar, Verifikation negativ");
            return false;
        }
    };

    match argon2_instanz().verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            tracing::debug!(fehler = %e, "Passwort-Verifikation fehlgeschlagen");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passwort_hashen_und_verifizieren() {
        let passwort = "sicheres_passwort_123!";
        let hash = passwort_hashen(passwort).expect("Hashing fehlgeschlagen");

        assert!(!hash.is_empty());
        assert!(
            hash.starts_with("$argon2id$"),
            "Hash muss mit $argon2id$ beginnen"
        );

        assert!(passwort_verifizieren(passwort, &hash));
    }

    #[test]
    fn falsches_passwort_wird_abgelehnt() {
        let hash = passwort_hashen("richtiges_passwort").expect("Hashing fehlgeschlagen");
        assert!(!passwort_verifizieren("falsches_passwort", &hash));
    }

    #[test]
    fn gleiche_passwoerter_unterschiedliche_hashes() {
        let passwort = "gleiches_passwort";
        let hash1 = passwort_hashen(passwort).expect("Hashing 1 fehlgeschlagen");
        let hash2 = passwort_hashen(passwort).expect("Hashing 2 fehlgeschlagen");

        assert_ne!(
            hash1, hash2,
            "Gleiche Passwoerter muessen verschiedene Hashes erzeugen (Salt)"
        );
    }

    #[test]
    fn ungueltiges_hash_format_verifiziert_negativ() {
        // Kein Fehler, sondern schlicht kein Treffer
        assert!(!passwort_verifizieren("passwort", "kein_gueltiger_hash"));
        assert!(!passwort_verifizieren("passwort", ""));
    }
}
