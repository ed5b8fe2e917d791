//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Der AuthService arbeitet ausschliesslich gegen
//! dieses Trait; Tests haengen eine In-Memory-Implementierung dahinter.

use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};

/// Repository fuer Benutzer-Datenzugriffe
///
/// `create` schlaegt mit [`crate::DbError::Eindeutigkeit`] fehl wenn die
/// E-Mail bereits vergeben ist. Implementierungen normalisieren die E-Mail
/// via [`crate::models::email_normalisieren`] auf Insert- UND Update-Pfad.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner ID laden
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner (normalisierten) E-Mail laden
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer aktualisieren (nur gesetzte Felder)
    async fn update(&self, id: Uuid, data: BenutzerUpdate) -> DbResult<BenutzerRecord>;

    /// Letzten Login-Zeitpunkt auf jetzt setzen
    async fn update_last_login(&self, id: Uuid) -> DbResult<()>;
}
