//! tradepost-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den Einstiegspunkt fuer den
//! Serverstart bereit.

pub mod config;
pub mod rest;
pub mod ws;

use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tradepost_auth::{AuthService, TokenService};
use tradepost_db::{DatabaseConfig, SqliteDb};
use tradepost_realtime::MessagesGateway;

use config::ServerConfig;
use rest::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen (inkl. Migrationen)
    /// 2. Auth-Service und Chat-Gateway aufbauen
    /// 3. HTTP/WebSocket-Listener starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        if self.config.hat_entwicklungs_geheimnis() {
            tracing::warn!(
                "Token-Geheimnis ist der Entwicklungs-Platzhalter – \
                 fuer den Betrieb TRADEPOST_TOKEN_GEHEIMNIS setzen"
            );
        }

        let db = Arc::new(
            SqliteDb::oeffnen(&DatabaseConfig {
                url: self.config.datenbank.url.clone(),
                max_verbindungen: self.config.datenbank.max_verbindungen,
                wal: self.config.datenbank.wal,
            })
            .await?,
        );

        let tokens = Arc::new(TokenService::neu(
            &self.config.auth.token_geheimnis,
            self.config.auth.token_gueltigkeit_minuten,
        ));
        let auth = Arc::new(AuthService::neu(Arc::clone(&db), tokens));
        let gateway = Arc::new(MessagesGateway::neu(Arc::clone(&auth)));

        let state = AppState {
            auth,
            gateway,
            rollen: Arc::new(rest::rollen_tabelle()),
        };

        let app = rest::routes::router()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(self.config.api_bind_adresse()).await?;
        tracing::info!(adresse = %self.config.api_bind_adresse(), "HTTP/WebSocket-Listener bereit");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;

        Ok(())
    }
}
