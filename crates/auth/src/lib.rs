//! tradepost-auth – Credential- und Zugriffs-Service
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Signierte Bearer-Tokens (HS256, nur Subject-Claims)
//! - AuthService (Registrierung, Login, Status-Erneuerung,
//!   Identitaetsaufloesung)
//! - Rollen-Guard mit deklarativer Operations-Tabelle

pub mod error;
pub mod guard;
pub mod password;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AnmeldeDetail, AuthError, AuthResult};
pub use guard::{zugriff_pruefen, RollenTabelle};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::{AngemeldeterBenutzer, AuthService, BenutzerProfil};
pub use token::{TokenService, TOKEN_GUELTIGKEIT_MINUTEN};
