//! SQLite-Backend: Pool und Repository-Implementierungen

pub mod pool;
pub mod users;

pub use pool::{DatabaseConfig, SqliteDb};
