//! tradepost-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit: der AuthService
//! arbeitet gegen das [`UserRepository`]-Trait, die SQLite-Implementierung
//! haengt dahinter. Eindeutigkeitsverletzungen (doppelte E-Mail) sind als
//! [`DbError::Eindeutigkeit`] unterscheidbar.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use repository::UserRepository;
pub use sqlite::{DatabaseConfig, SqliteDb};
