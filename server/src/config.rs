//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Nach dem Start wird die Konfiguration nicht mehr
//! veraendert.

use serde::{Deserialize, Serialize};

/// Platzhalter-Geheimnis fuer die lokale Entwicklung
pub const ENTWICKLUNGS_GEHEIMNIS: &str = "entwicklungs-geheimnis-bitte-aendern";

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Auth-Einstellungen (Token-Geheimnis und -Gueltigkeit)
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Tradepost Server".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer HTTP und WebSocket
    pub bind_adresse: String,
    /// Port fuer die REST-API und den WebSocket-Endpunkt
    pub api_port: u16,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 3000,
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// Ob WAL-Modus aktiviert werden soll
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://tradepost.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

/// Auth-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// Prozessweites Signatur-Geheimnis fuer Bearer-Tokens
    ///
    /// Ueberschreibbar per Umgebungsvariable `TRADEPOST_TOKEN_GEHEIMNIS`.
    pub token_geheimnis: String,
    /// Gueltigkeit ausgestellter Tokens in Minuten
    pub token_gueltigkeit_minuten: i64,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            token_geheimnis: ENTWICKLUNGS_GEHEIMNIS.into(),
            token_gueltigkeit_minuten: tradepost_auth::TOKEN_GUELTIGKEIT_MINUTEN,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        let mut config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Self::default()
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };

        if let Ok(geheimnis) = std::env::var("TRADEPOST_TOKEN_GEHEIMNIS") {
            config.auth.token_geheimnis = geheimnis;
        }

        Ok(config)
    }

    /// Gibt die vollstaendige Bind-Adresse fuer HTTP/WebSocket zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }

    /// Prueft ob noch das Entwicklungs-Geheimnis konfiguriert ist
    pub fn hat_entwicklungs_geheimnis(&self) -> bool {
        self.auth.token_geheimnis == ENTWICKLUNGS_GEHEIMNIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.api_port, 3000);
        assert_eq!(cfg.datenbank.url, "sqlite://tradepost.db");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.auth.token_gueltigkeit_minuten, 120);
        assert!(cfg.hat_entwicklungs_geheimnis());
    }

    #[test]
    fn bind_adresse() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.api_bind_adresse(), "0.0.0.0:3000");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Mein Server"

            [netzwerk]
            api_port = 8080

            [auth]
            token_geheimnis = "streng-geheim"
            token_gueltigkeit_minuten = 30
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Mein Server");
        assert_eq!(cfg.netzwerk.api_port, 8080);
        assert_eq!(cfg.auth.token_geheimnis, "streng-geheim");
        assert_eq!(cfg.auth.token_gueltigkeit_minuten, 30);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.netzwerk.bind_adresse, "0.0.0.0");
        assert!(cfg.datenbank.wal);
        assert!(!cfg.hat_entwicklungs_geheimnis());
    }
}
