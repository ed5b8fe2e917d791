//! SQLite-Implementierung des UserRepository

use chrono::Utc;
use tradepost_core::Rolle;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{email_normalisieren, BenutzerRecord, BenutzerUpdate, NeuerBenutzer};
use crate::repository::UserRepository;
use crate::sqlite::pool::SqliteDb;

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = Uuid::new_v4();
        let email = email_normalisieren(data.email);
        let roles = vec![Rolle::User];
        let roles_json = serde_json::to_string(&roles)?;
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, full_name, password_hash, roles, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(id.to_string())
        .bind(&email)
        .bind(data.full_name)
        .bind(data.password_hash)
        .bind(&roles_json)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!("E-Mail '{email}' bereits vergeben"))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id,
            email,
            full_name: data.full_name.to_string(),
            password_hash: data.password_hash.to_string(),
            roles,
            is_active: true,
            created_at: now,
            last_login: None,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, full_name, password_hash, roles, is_active, created_at, last_login
             FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, full_name, password_hash, roles, is_active, created_at, last_login
             FROM users WHERE email = ?",
        )
        .bind(email_normalisieren(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn update(&self, id: Uuid, data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = Vec::new();
        if data.email.is_some() {
            sets.push("email = ?");
        }
        if data.password_hash.is_some() {
            sets.push("password_hash = ?");
        }
        if data.roles.is_some() {
            sets.push("roles = ?");
        }
        if data.is_active.is_some() {
            sets.push("is_active = ?");
        }
        if data.last_login.is_some() {
            sets.push("last_login = ?");
        }

        if sets.is_empty() {
            return self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("User {id}")));
        }

        let roles_json = data
            .roles
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        let mut q = sqlx::query(&sql);

        if let Some(ref v) = data.email {
            // Update-Pfad normalisiert identisch zum Insert-Pfad
            q = q.bind(email_normalisieren(v));
        }
        if let Some(ref v) = data.password_hash {
            q = q.bind(v);
        }
        if let Some(ref v) = roles_json {
            q = q.bind(v);
        }
        if let Some(v) = data.is_active {
            q = q.bind(v as i64);
        }
        if let Some(ref v) = data.last_login {
            q = q.bind(v.to_rfc3339());
        }
        q = q.bind(id.to_string());

        let affected = q.execute(&self.pool).await?.rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("User {id}")));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::intern("User nach Update nicht gefunden"))
    }

    async fn update_last_login(&self, id: Uuid) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(&now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    use sqlx::Row as _;

    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID '{id_str}': {e}")))?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    let last_login: Option<String> = row.try_get("last_login")?;
    let last_login = last_login
        .as_deref()
        .map(|s| {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| DbError::intern(format!("Ungueltige last_login '{s}': {e}")))
        })
        .transpose()?;

    let roles_json: String = row.try_get("roles")?;
    let roles: Vec<Rolle> = serde_json::from_str(&roles_json)?;

    let is_active: i64 = row.try_get("is_active")?;

    Ok(BenutzerRecord {
        id,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        password_hash: row.try_get("password_hash")?,
        roles,
        is_active: is_active != 0,
        created_at,
        last_login,
    })
}
